use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::errors::StoreKitError;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_identifier: String,
    pub localized_title: String,
    pub localized_description: String,
    /// Decimal price in the currency of `price_locale`, as a string to avoid
    /// rounding.
    pub price: String,
    pub price_locale: String,
}

/// Signed discount offer applied to a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDiscount {
    pub identifier: String,
    pub key_identifier: String,
    pub nonce: String,
    pub signature: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    pub product: Product,
    pub quantity: u32,
    /// Finish the transaction as soon as it completes. If `false`, the caller
    /// must finish it once the content is delivered.
    pub atomically: bool,
    /// Opaque token associating the purchase with a user account on your
    /// service.
    pub app_account_token: Option<String>,
    pub simulates_ask_to_buy_in_sandbox: bool,
    pub payment_discount: Option<PaymentDiscount>,
}

impl PurchaseRequest {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
            atomically: true,
            app_account_token: None,
            simulates_ask_to_buy_in_sandbox: false,
            payment_discount: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_atomically(mut self, atomically: bool) -> Self {
        self.atomically = atomically;
        self
    }

    pub fn with_app_account_token(mut self, app_account_token: impl Into<String>) -> Self {
        self.app_account_token = Some(app_account_token.into());
        self
    }

    pub fn with_simulates_ask_to_buy_in_sandbox(mut self, simulates: bool) -> Self {
        self.simulates_ask_to_buy_in_sandbox = simulates;
        self
    }

    pub fn with_payment_discount(mut self, payment_discount: PaymentDiscount) -> Self {
        self.payment_discount = Some(payment_discount);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Purchasing,
    Purchased,
    Failed,
    Restored,
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTransaction {
    pub transaction_identifier: Option<String>,
    pub transaction_state: TransactionState,
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseDetails {
    pub product_id: String,
    pub quantity: u32,
    pub product: Product,
    pub transaction: PaymentTransaction,
    pub original_transaction: Option<PaymentTransaction>,
    pub needs_finish_transaction: bool,
}

/// A restored purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub product_id: String,
    pub quantity: u32,
    pub transaction: PaymentTransaction,
    pub original_transaction: Option<PaymentTransaction>,
    pub needs_finish_transaction: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RetrieveResults {
    pub retrieved_products: Vec<Product>,
    pub invalid_product_ids: HashSet<String>,
    pub error: Option<StoreKitError>,
}

#[derive(Debug, Clone, Default)]
pub struct RestoreResults {
    pub restored_purchases: Vec<Purchase>,
    /// Each failure with the identifier of the product it concerns, if known.
    pub restore_failed_purchases: Vec<(StoreKitError, Option<String>)>,
}
