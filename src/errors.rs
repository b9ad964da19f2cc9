use thiserror::Error;

use crate::domain::entities::receipt_status::ReceiptStatus;

/// Reasons a receipt could not be verified.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("No receipt data available.")]
    NoReceiptData,
    #[error("Failed to encode verifyReceipt request body: {0}")]
    RequestBodyEncodeFailed(#[source] serde_json::Error),
    #[error("Callout to verifyReceipt failed: {0}")]
    NetworkError(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("verifyReceipt returned no data.")]
    MissingRemoteData,
    /// Holds the raw response body, exactly as received.
    #[error("Failed to parse verifyReceipt response as a JSON object ({} bytes).", .0.len())]
    JsonDecodeFailed(Vec<u8>),
    /// `None` when the response had no integer `status` field.
    #[error("verifyReceipt returned an invalid status: {0:?}.")]
    InvalidStatus(Option<ReceiptStatus>),
    /// The validation was superseded by a newer call, or the validator was
    /// dropped while the call was in flight.
    #[error("Receipt validation was cancelled.")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKitErrorCode {
    Unknown,
    ClientInvalid,
    PaymentCancelled,
    PaymentInvalid,
    PaymentNotAllowed,
    StoreProductNotAvailable,
    CloudServicePermissionDenied,
    CloudServiceNetworkConnectionFailed,
    CloudServiceRevoked,
    PrivacyAcknowledgementRequired,
    UnauthorizedRequestData,
    InvalidOfferIdentifier,
    InvalidSignature,
    MissingOfferParams,
    InvalidOfferPrice,
}

/// Error reported by a purchase engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Purchase engine error ({code:?}): {message}")]
pub struct StoreKitError {
    pub code: StoreKitErrorCode,
    pub message: String,
}

impl StoreKitError {
    pub fn new(code: StoreKitErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error raised by the async purchase adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    StoreKit(#[from] StoreKitError),
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    #[error("Purchase engine dropped its completion without calling it.")]
    CallbackDropped,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'.")]
    InvalidValue { key: &'static str, value: String },
}
