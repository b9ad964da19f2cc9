use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// Request body sent to verifyReceipt.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct VerifyReceiptRequestModel<'a> {
    /// The Base64-encoded receipt data.
    pub(crate) receipt_data: String,
    /// Your app's shared secret, which is a hexadecimal string. Only sent when
    /// non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<&'a str>,
    /// Set this value to true for the response to include only the latest
    /// renewal transaction for any subscriptions. Only sent when true.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub(crate) exclude_old_transactions: bool,
}

impl<'a> VerifyReceiptRequestModel<'a> {
    pub(crate) fn new(
        receipt_data: &[u8],
        shared_secret: Option<&'a str>,
        exclude_old_transactions: bool,
    ) -> Self {
        Self {
            receipt_data: STANDARD.encode(receipt_data),
            password: shared_secret.filter(|secret| !secret.is_empty()),
            exclude_old_transactions,
        }
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
