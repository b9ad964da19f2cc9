use crate::{
    errors::ConfigError,
    secrets::{ReceiptSecretsConfig, SecretValues},
};

use super::verify_receipt_service::{VerifyReceiptEndpoints, VerifyReceiptService};

#[derive(Debug, Clone, Default)]
pub struct ReceiptValidatorConfig {
    /// Service to try first. Should be production unless the receipts are
    /// known to come from the sandbox.
    pub service: VerifyReceiptService,
    /// Your app's shared secret (a hexadecimal string). Only required for
    /// receipts that contain auto-renewable subscriptions.
    pub shared_secret: Option<String>,
    /// Only return the latest renewal transaction for each subscription.
    pub exclude_old_transactions: bool,
    pub endpoints: VerifyReceiptEndpoints,
}

impl ReceiptValidatorConfig {
    pub fn new(service: VerifyReceiptService, shared_secret: Option<String>) -> Self {
        Self {
            service,
            shared_secret,
            ..Default::default()
        }
    }

    pub fn with_exclude_old_transactions(mut self, exclude_old_transactions: bool) -> Self {
        self.exclude_old_transactions = exclude_old_transactions;
        self
    }

    pub fn with_endpoints(mut self, endpoints: VerifyReceiptEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_secrets(&SecretValues::from_env())
    }

    pub fn from_secrets(secrets: &SecretValues) -> Result<Self, ConfigError> {
        let service = match secrets
            .get_optional(&ReceiptSecretsConfig::AppleVerifyReceiptEnvironment)
        {
            Some(value) => value.parse::<VerifyReceiptService>().map_err(|value| {
                ConfigError::InvalidValue {
                    key: ReceiptSecretsConfig::AppleVerifyReceiptEnvironment.key(),
                    value,
                }
            })?,
            None => VerifyReceiptService::default(),
        };
        let exclude_old_transactions = match secrets
            .get_optional(&ReceiptSecretsConfig::AppleVerifyReceiptExcludeOldTransactions)
        {
            Some(value) => value
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ReceiptSecretsConfig::AppleVerifyReceiptExcludeOldTransactions.key(),
                    value: value.to_string(),
                })?,
            None => false,
        };
        Ok(Self::new(
            service,
            secrets
                .get_optional(&ReceiptSecretsConfig::AppleSharedSecret)
                .map(str::to_string),
        )
        .with_exclude_old_transactions(exclude_old_transactions))
    }
}
