use async_trait::async_trait;

use crate::{
    domain::entities::verification_result::{ReceiptInfo, VerificationResult},
    errors::ReceiptError,
};

use super::completion::{await_completion, Completion};

#[async_trait]
pub trait ReceiptValidator: Send + Sync {
    /// Validates `receipt_data` and reports the outcome to `completion`.
    ///
    /// `completion` is called at most once. It is not called if the validation
    /// is cancelled.
    fn validate(&self, receipt_data: Vec<u8>, completion: Completion<VerificationResult>);

    /// Async form of `validate`. A cancelled validation resolves to
    /// `ReceiptError::Cancelled`.
    async fn validate_async(&self, receipt_data: Vec<u8>) -> VerificationResult {
        await_completion(|completion| self.validate(receipt_data, completion))
            .await
            .unwrap_or_else(|| {
                VerificationResult::unverified(ReceiptInfo::new(), ReceiptError::Cancelled)
            })
    }
}
