use std::collections::HashMap;

pub const APPLE_SHARED_SECRET: &str = "APPLE_SHARED_SECRET";
pub const APPLE_VERIFY_RECEIPT_ENVIRONMENT: &str = "APPLE_VERIFY_RECEIPT_ENVIRONMENT";
pub const APPLE_VERIFY_RECEIPT_EXCLUDE_OLD_TRANSACTIONS: &str =
    "APPLE_VERIFY_RECEIPT_EXCLUDE_OLD_TRANSACTIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptSecretsConfig {
    AppleSharedSecret,
    AppleVerifyReceiptEnvironment,
    AppleVerifyReceiptExcludeOldTransactions,
}

impl ReceiptSecretsConfig {
    pub const ALL: [ReceiptSecretsConfig; 3] = [
        ReceiptSecretsConfig::AppleSharedSecret,
        ReceiptSecretsConfig::AppleVerifyReceiptEnvironment,
        ReceiptSecretsConfig::AppleVerifyReceiptExcludeOldTransactions,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReceiptSecretsConfig::AppleSharedSecret => APPLE_SHARED_SECRET,
            ReceiptSecretsConfig::AppleVerifyReceiptEnvironment => APPLE_VERIFY_RECEIPT_ENVIRONMENT,
            ReceiptSecretsConfig::AppleVerifyReceiptExcludeOldTransactions => {
                APPLE_VERIFY_RECEIPT_EXCLUDE_OLD_TRANSACTIONS
            }
        }
    }
}

/// Resolved secret values. Empty values are treated as unset.
#[derive(Debug, Default, Clone)]
pub struct SecretValues {
    values: HashMap<ReceiptSecretsConfig, String>,
}

impl SecretValues {
    pub fn from_env() -> Self {
        Self::from_pairs(ReceiptSecretsConfig::ALL.into_iter().filter_map(|secret| {
            std::env::var(secret.key())
                .ok()
                .map(|value| (secret, value))
        }))
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (ReceiptSecretsConfig, String)>,
    ) -> Self {
        Self {
            values: pairs
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .collect(),
        }
    }

    pub fn get_optional(&self, secret: &ReceiptSecretsConfig) -> Option<&str> {
        self.values.get(secret).map(String::as_str)
    }
}
