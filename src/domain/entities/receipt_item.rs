use chrono::{DateTime, Duration, Utc};

/// One in-app purchase entry of a verified receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptItem {
    /// The product identifier of the item that was purchased.
    pub product_id: String,
    /// The number of items purchased.
    pub quantity: u32,
    /// The transaction identifier of the item that was purchased.
    pub transaction_id: String,
    /// For a transaction that restores a previous transaction, the transaction
    /// identifier of the original transaction. Otherwise, identical to the
    /// transaction identifier.
    pub original_transaction_id: String,
    /// The date and time that the item was purchased.
    pub purchase_date: DateTime<Utc>,
    /// For a transaction that restores a previous transaction, the date of the
    /// original transaction.
    pub original_purchase_date: DateTime<Utc>,
    /// The primary key for identifying subscription purchases.
    pub web_order_line_item_id: Option<String>,
    /// The expiration date for the subscription. Only present for
    /// auto-renewable subscription receipts.
    pub subscription_expiration_date: Option<DateTime<Utc>>,
    /// For a transaction that was cancelled by Apple customer support, the
    /// time and date of the cancellation. Treat a cancelled receipt the same
    /// as if no purchase had ever been made.
    pub cancellation_date: Option<DateTime<Utc>>,
    pub is_trial_period: bool,
    pub is_in_intro_offer_period: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionType {
    AutoRenewable,
    NonRenewing { valid_duration: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyPurchaseResult {
    Purchased(ReceiptItem),
    NotPurchased,
}

/// `items` are sorted by expiry date, latest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifySubscriptionResult {
    Purchased {
        expiry_date: DateTime<Utc>,
        items: Vec<ReceiptItem>,
    },
    Expired {
        expiry_date: DateTime<Utc>,
        items: Vec<ReceiptItem>,
    },
    NotPurchased,
}
