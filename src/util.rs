use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
    data::{
        datasources::verify_receipt_datasource::VerifyReceiptDatasourceImpl,
        repositories::{apple_receipt_validator_impl::AppleReceiptValidator, in_app_receipt_impl},
    },
    domain::{
        entities::{
            receipt_item::{
                ReceiptItem, SubscriptionType, VerifyPurchaseResult, VerifySubscriptionResult,
            },
            receipt_validator_config::ReceiptValidatorConfig,
            verification_result::{ReceiptInfo, VerificationResult},
            verify_receipt_service::VerifyReceiptService,
        },
        repositories::{completion::Completion, receipt_validator::ReceiptValidator},
    },
    errors::{ConfigError, ReceiptError},
};

pub struct ReceiptUtil<V: ReceiptValidator> {
    receipt_validator: V,
}

impl<V: ReceiptValidator> ReceiptUtil<V> {
    pub fn with_validator(receipt_validator: V) -> Self {
        Self { receipt_validator }
    }

    pub fn validator(&self) -> &V {
        &self.receipt_validator
    }

    pub async fn validate_receipt(&self, receipt_data: Vec<u8>) -> VerificationResult {
        self.receipt_validator.validate_async(receipt_data).await
    }

    /// Returns the receipt info only if the receipt was verified.
    pub async fn verify(&self, receipt_data: Vec<u8>) -> Result<ReceiptInfo, ReceiptError> {
        self.validate_receipt(receipt_data).await.into_result()
    }

    pub fn verify_purchase(
        &self,
        product_id: &str,
        receipt_info: &ReceiptInfo,
    ) -> VerifyPurchaseResult {
        in_app_receipt_impl::verify_purchase(product_id, receipt_info)
    }

    pub fn verify_subscription(
        &self,
        subscription_type: SubscriptionType,
        product_id: &str,
        receipt_info: &ReceiptInfo,
        valid_until: DateTime<Utc>,
    ) -> VerifySubscriptionResult {
        in_app_receipt_impl::verify_subscription(
            subscription_type,
            product_id,
            receipt_info,
            valid_until,
        )
    }

    /// Verifies a group of subscriptions, such as the monthly and yearly
    /// variants of one plan.
    pub fn verify_subscriptions(
        &self,
        subscription_type: SubscriptionType,
        product_ids: &HashSet<String>,
        receipt_info: &ReceiptInfo,
        valid_until: DateTime<Utc>,
    ) -> VerifySubscriptionResult {
        in_app_receipt_impl::verify_subscriptions(
            subscription_type,
            product_ids,
            receipt_info,
            valid_until,
        )
    }

    pub fn in_app_items(&self, receipt_info: &ReceiptInfo) -> Vec<ReceiptItem> {
        in_app_receipt_impl::in_app_items(receipt_info)
    }

    pub fn latest_receipt_items(&self, receipt_info: &ReceiptInfo) -> Vec<ReceiptItem> {
        in_app_receipt_impl::latest_receipt_items(receipt_info)
    }
}

impl<V: ReceiptValidator> ReceiptValidator for ReceiptUtil<V> {
    fn validate(&self, receipt_data: Vec<u8>, completion: Completion<VerificationResult>) {
        self.receipt_validator.validate(receipt_data, completion)
    }
}

impl ReceiptUtil<AppleReceiptValidator<VerifyReceiptDatasourceImpl>> {
    pub fn new(config: ReceiptValidatorConfig) -> Self {
        Self::with_validator(AppleReceiptValidator::new(config))
    }

    /// Reads the configuration from the environment, see `secrets`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ReceiptValidatorConfig::from_env()?))
    }

    pub fn service(&self) -> VerifyReceiptService {
        self.receipt_validator.service()
    }
}
