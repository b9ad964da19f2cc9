use crate::errors::ReceiptError;

use super::receipt_status::ReceiptStatus;

/// Decoded verifyReceipt response. Left untyped, since Apple versions the
/// response schema independently.
pub type ReceiptInfo = serde_json::Map<String, serde_json::Value>;

#[derive(Debug)]
pub enum VerificationResult {
    Verified {
        receipt_info: ReceiptInfo,
    },
    /// `receipt_info` holds whatever was decoded before the failure, which may
    /// be empty.
    Unverified {
        receipt_info: ReceiptInfo,
        error: ReceiptError,
    },
}

impl VerificationResult {
    pub(crate) fn unverified(receipt_info: ReceiptInfo, error: ReceiptError) -> Self {
        VerificationResult::Unverified {
            receipt_info,
            error,
        }
    }

    pub(crate) fn from_status(receipt_info: ReceiptInfo, status: ReceiptStatus) -> Self {
        if status.is_valid() {
            VerificationResult::Verified { receipt_info }
        } else {
            Self::unverified(receipt_info, ReceiptError::InvalidStatus(Some(status)))
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationResult::Verified { .. })
    }

    pub fn receipt_info(&self) -> &ReceiptInfo {
        match self {
            VerificationResult::Verified { receipt_info }
            | VerificationResult::Unverified { receipt_info, .. } => receipt_info,
        }
    }

    pub fn error(&self) -> Option<&ReceiptError> {
        match self {
            VerificationResult::Verified { .. } => None,
            VerificationResult::Unverified { error, .. } => Some(error),
        }
    }

    /// Drops any partial receipt info of an unverified result.
    pub fn into_result(self) -> Result<ReceiptInfo, ReceiptError> {
        match self {
            VerificationResult::Verified { receipt_info } => Ok(receipt_info),
            VerificationResult::Unverified { error, .. } => Err(error),
        }
    }
}
