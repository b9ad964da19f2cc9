use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;

use crate::{
    domain::entities::{
        store_product::{
            Purchase, PurchaseDetails, PurchaseRequest, RestoreResults, RetrieveResults,
        },
        verification_result::{ReceiptInfo, VerificationResult},
    },
    errors::{ReceiptError, StoreError, StoreKitError},
};

use super::{
    completion::{await_completion, Completion},
    receipt_validator::ReceiptValidator,
};

/// Callback-based purchase engine, such as a bridge to the platform payment
/// queue.
///
/// Implementations must call each completion at most once.
pub trait PurchaseEngine: Send + Sync {
    /// Retrieve products information.
    fn retrieve_products_info(
        &self,
        product_ids: HashSet<String>,
        completion: Completion<RetrieveResults>,
    );

    /// Purchase a product.
    fn purchase_product(
        &self,
        request: PurchaseRequest,
        completion: Completion<Result<PurchaseDetails, StoreKitError>>,
    );

    /// Restore previous purchases.
    fn restore_purchases(
        &self,
        atomically: bool,
        app_account_token: Option<String>,
        completion: Completion<RestoreResults>,
    );

    /// Verify the application receipt, fetching it first if needed.
    ///
    /// force_refresh:
    ///   Refresh the receipt even if one already exists.
    fn verify_receipt(
        &self,
        validator: Arc<dyn ReceiptValidator>,
        force_refresh: bool,
        completion: Completion<VerificationResult>,
    );

    /// Fetch the application receipt data.
    ///
    /// force_refresh:
    ///   Refresh the receipt even if one already exists.
    fn fetch_receipt(
        &self,
        force_refresh: bool,
        completion: Completion<Result<Vec<u8>, ReceiptError>>,
    );
}

/// Async adapters over a `PurchaseEngine`.
///
/// Each adapter calls the underlying operation once and resumes with the value
/// its completion produced. Dropping the returned future does not cancel the
/// underlying operation.
#[async_trait]
pub trait PurchaseEngineAsyncExt: PurchaseEngine {
    async fn products<I>(&self, product_ids: I) -> Result<RetrieveResults, StoreError>
    where
        I: IntoIterator<Item = String> + Send,
    {
        let product_ids: HashSet<String> = product_ids.into_iter().collect();
        await_completion(|completion| self.retrieve_products_info(product_ids, completion))
            .await
            .ok_or(StoreError::CallbackDropped)
    }

    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseDetails, StoreError> {
        await_completion(|completion| self.purchase_product(request, completion))
            .await
            .ok_or(StoreError::CallbackDropped)?
            .map_err(StoreError::from)
    }

    /// Fails with the first restore failure, if any.
    async fn restore(
        &self,
        atomically: bool,
        app_account_token: Option<String>,
    ) -> Result<Vec<Purchase>, StoreError> {
        let mut results = await_completion(|completion| {
            self.restore_purchases(atomically, app_account_token, completion)
        })
        .await
        .ok_or(StoreError::CallbackDropped)?;
        if results.restore_failed_purchases.is_empty() {
            Ok(results.restored_purchases)
        } else {
            Err(results.restore_failed_purchases.swap_remove(0).0.into())
        }
    }

    /// Fails with the receipt error if the receipt is not verified.
    async fn verify_receipt_async(
        &self,
        validator: Arc<dyn ReceiptValidator>,
        force_refresh: bool,
    ) -> Result<ReceiptInfo, StoreError> {
        await_completion(|completion| {
            PurchaseEngine::verify_receipt(self, validator, force_refresh, completion)
        })
        .await
        .ok_or(StoreError::CallbackDropped)?
        .into_result()
        .map_err(StoreError::from)
    }

    async fn receipt_data(&self, force_refresh: bool) -> Result<Vec<u8>, StoreError> {
        await_completion(|completion| self.fetch_receipt(force_refresh, completion))
            .await
            .ok_or(StoreError::CallbackDropped)?
            .map_err(StoreError::from)
    }
}

impl<E: PurchaseEngine + ?Sized> PurchaseEngineAsyncExt for E {}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{
        domain::entities::{
            receipt_status::ReceiptStatus,
            store_product::{PaymentTransaction, Product, TransactionState},
        },
        errors::StoreKitErrorCode,
    };

    fn product(id: &str) -> Product {
        Product {
            product_identifier: id.to_string(),
            localized_title: "Coins".to_string(),
            localized_description: "A pile of coins".to_string(),
            price: "0.99".to_string(),
            price_locale: "en_US".to_string(),
        }
    }

    fn transaction(state: TransactionState) -> PaymentTransaction {
        PaymentTransaction {
            transaction_identifier: Some("1000000000000001".to_string()),
            transaction_state: state,
            transaction_date: None,
        }
    }

    fn restored(id: &str) -> Purchase {
        Purchase {
            product_id: id.to_string(),
            quantity: 1,
            transaction: transaction(TransactionState::Restored),
            original_transaction: None,
            needs_finish_transaction: false,
        }
    }

    /// Completes every call from a spawned task, like a payment queue
    /// observer would.
    #[derive(Default)]
    struct FakeEngine {
        restore_failures: Vec<(StoreKitError, Option<String>)>,
        receipt: Option<Vec<u8>>,
        purchase_requests: Mutex<Vec<PurchaseRequest>>,
    }

    impl PurchaseEngine for FakeEngine {
        fn retrieve_products_info(
            &self,
            product_ids: HashSet<String>,
            completion: Completion<RetrieveResults>,
        ) {
            tokio::spawn(async move {
                let (retrieved, invalid): (Vec<_>, Vec<_>) =
                    product_ids.into_iter().partition(|id| id.starts_with("com.app."));
                completion(RetrieveResults {
                    retrieved_products: retrieved.iter().map(|id| product(id)).collect(),
                    invalid_product_ids: invalid.into_iter().collect(),
                    error: None,
                })
            });
        }

        fn purchase_product(
            &self,
            request: PurchaseRequest,
            completion: Completion<Result<PurchaseDetails, StoreKitError>>,
        ) {
            self.purchase_requests.lock().unwrap().push(request.clone());
            let result = if request.simulates_ask_to_buy_in_sandbox {
                Err(StoreKitError::new(
                    StoreKitErrorCode::PaymentNotAllowed,
                    "Ask to buy is pending.",
                ))
            } else {
                Ok(PurchaseDetails {
                    product_id: request.product.product_identifier.clone(),
                    quantity: request.quantity,
                    product: request.product,
                    transaction: transaction(TransactionState::Purchased),
                    original_transaction: None,
                    needs_finish_transaction: !request.atomically,
                })
            };
            tokio::spawn(async move { completion(result) });
        }

        fn restore_purchases(
            &self,
            _atomically: bool,
            _app_account_token: Option<String>,
            completion: Completion<RestoreResults>,
        ) {
            let results = RestoreResults {
                restored_purchases: vec![restored("com.app.coins"), restored("com.app.gems")],
                restore_failed_purchases: self.restore_failures.clone(),
            };
            tokio::spawn(async move { completion(results) });
        }

        fn verify_receipt(
            &self,
            validator: Arc<dyn ReceiptValidator>,
            _force_refresh: bool,
            completion: Completion<VerificationResult>,
        ) {
            match self.receipt.clone() {
                Some(receipt) => validator.validate(receipt, completion),
                None => completion(VerificationResult::unverified(
                    ReceiptInfo::new(),
                    ReceiptError::NoReceiptData,
                )),
            }
        }

        fn fetch_receipt(
            &self,
            _force_refresh: bool,
            completion: Completion<Result<Vec<u8>, ReceiptError>>,
        ) {
            completion(self.receipt.clone().ok_or(ReceiptError::NoReceiptData));
        }
    }

    /// Never calls back.
    struct SilentEngine;

    impl PurchaseEngine for SilentEngine {
        fn retrieve_products_info(&self, _: HashSet<String>, _: Completion<RetrieveResults>) {}
        fn purchase_product(
            &self,
            _: PurchaseRequest,
            _: Completion<Result<PurchaseDetails, StoreKitError>>,
        ) {
        }
        fn restore_purchases(&self, _: bool, _: Option<String>, _: Completion<RestoreResults>) {}
        fn verify_receipt(
            &self,
            _: Arc<dyn ReceiptValidator>,
            _: bool,
            _: Completion<VerificationResult>,
        ) {
        }
        fn fetch_receipt(&self, _: bool, _: Completion<Result<Vec<u8>, ReceiptError>>) {}
    }

    /// Answers with a fixed status.
    struct StatusValidator(i64);

    impl ReceiptValidator for StatusValidator {
        fn validate(&self, _receipt_data: Vec<u8>, completion: Completion<VerificationResult>) {
            let receipt_info = match json!({ "status": self.0 }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            };
            completion(VerificationResult::from_status(
                receipt_info,
                ReceiptStatus::from_code(self.0),
            ));
        }
    }

    #[tokio::test]
    async fn products_splits_valid_and_invalid_ids() {
        let engine = FakeEngine::default();
        let results = engine
            .products(vec!["com.app.coins".to_string(), "bogus".to_string()])
            .await
            .unwrap();
        assert_eq!(results.retrieved_products, vec![product("com.app.coins")]);
        assert!(results.invalid_product_ids.contains("bogus"));
    }

    #[tokio::test]
    async fn purchase_forwards_request_and_returns_details() {
        let engine = FakeEngine::default();
        let request = PurchaseRequest::new(product("com.app.coins"))
            .with_quantity(3)
            .with_atomically(false)
            .with_app_account_token("account-1");
        let details = engine.purchase(request.clone()).await.unwrap();
        assert_eq!(details.quantity, 3);
        assert!(details.needs_finish_transaction);
        assert_eq!(engine.purchase_requests.lock().unwrap().as_slice(), &[request]);
    }

    #[tokio::test]
    async fn purchase_failure_becomes_error() {
        let engine = FakeEngine::default();
        let request = PurchaseRequest::new(product("com.app.coins"))
            .with_simulates_ask_to_buy_in_sandbox(true);
        let error = engine.purchase(request).await.unwrap_err();
        assert!(matches!(
            error,
            StoreError::StoreKit(StoreKitError {
                code: StoreKitErrorCode::PaymentNotAllowed,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn restore_returns_restored_purchases() {
        let engine = FakeEngine::default();
        let purchases = engine.restore(true, None).await.unwrap();
        assert_eq!(purchases.len(), 2);
        assert_eq!(purchases[0].product_id, "com.app.coins");
    }

    #[tokio::test]
    async fn restore_fails_with_first_failure() {
        let engine = FakeEngine {
            restore_failures: vec![
                (
                    StoreKitError::new(StoreKitErrorCode::PaymentCancelled, "first"),
                    Some("com.app.coins".to_string()),
                ),
                (StoreKitError::new(StoreKitErrorCode::Unknown, "second"), None),
            ],
            ..Default::default()
        };
        let error = engine.restore(true, None).await.unwrap_err();
        assert!(matches!(
            error,
            StoreError::StoreKit(StoreKitError { ref message, .. }) if message == "first"
        ));
    }

    #[tokio::test]
    async fn verify_receipt_returns_info_when_verified() {
        let engine = FakeEngine {
            receipt: Some(b"receipt".to_vec()),
            ..Default::default()
        };
        let info = engine
            .verify_receipt_async(Arc::new(StatusValidator(0)), false)
            .await
            .unwrap();
        assert_eq!(info.get("status"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn verify_receipt_raises_unverified_result() {
        let engine = FakeEngine {
            receipt: Some(b"receipt".to_vec()),
            ..Default::default()
        };
        let error = engine
            .verify_receipt_async(Arc::new(StatusValidator(21003)), true)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            StoreError::Receipt(ReceiptError::InvalidStatus(Some(
                ReceiptStatus::ReceiptCouldNotBeAuthenticated
            )))
        ));
    }

    #[tokio::test]
    async fn receipt_data_returns_engine_receipt() {
        let engine = FakeEngine {
            receipt: Some(b"receipt".to_vec()),
            ..Default::default()
        };
        assert_eq!(engine.receipt_data(false).await.unwrap(), b"receipt".to_vec());

        let error = FakeEngine::default().receipt_data(true).await.unwrap_err();
        assert!(matches!(error, StoreError::Receipt(ReceiptError::NoReceiptData)));
    }

    #[tokio::test]
    async fn dropped_callbacks_become_errors() {
        let engine = SilentEngine;
        assert!(matches!(
            engine.products(Vec::<String>::new()).await,
            Err(StoreError::CallbackDropped)
        ));
        assert!(matches!(
            engine.receipt_data(false).await,
            Err(StoreError::CallbackDropped)
        ));
    }
}
