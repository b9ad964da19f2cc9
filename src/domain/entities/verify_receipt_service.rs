use std::{fmt, str::FromStr};

use crate::constants::{VERIFY_RECEIPT_PRODUCTION_URL, VERIFY_RECEIPT_SANDBOX_URL};

/// Which verifyReceipt endpoint a validator currently targets.
///
/// Receipts should always be sent to production first. The only allowed
/// transition is production to sandbox, taken when production answers that the
/// receipt belongs to the sandbox. It is never reversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerifyReceiptService {
    #[default]
    Production,
    Sandbox,
}

impl VerifyReceiptService {
    /// Returns `true` if the service moved from production to sandbox, and
    /// `false` if it was already targeting the sandbox.
    pub(crate) fn redirect_to_sandbox(&mut self) -> bool {
        match self {
            VerifyReceiptService::Production => {
                *self = VerifyReceiptService::Sandbox;
                true
            }
            VerifyReceiptService::Sandbox => false,
        }
    }
}

impl fmt::Display for VerifyReceiptService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyReceiptService::Production => write!(f, "production"),
            VerifyReceiptService::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl FromStr for VerifyReceiptService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(VerifyReceiptService::Production),
            "sandbox" => Ok(VerifyReceiptService::Sandbox),
            _ => Err(s.to_string()),
        }
    }
}

/// URLs of the two verifyReceipt services. Defaults to Apple's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReceiptEndpoints {
    pub production_url: String,
    pub sandbox_url: String,
}

impl VerifyReceiptEndpoints {
    pub fn url(&self, service: VerifyReceiptService) -> &str {
        match service {
            VerifyReceiptService::Production => &self.production_url,
            VerifyReceiptService::Sandbox => &self.sandbox_url,
        }
    }
}

impl Default for VerifyReceiptEndpoints {
    fn default() -> Self {
        Self {
            production_url: VERIFY_RECEIPT_PRODUCTION_URL.to_string(),
            sandbox_url: VERIFY_RECEIPT_SANDBOX_URL.to_string(),
        }
    }
}
