use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    constants::{IN_APP_KEY, LATEST_RECEIPT_INFO_KEY, RECEIPT_KEY},
    data::models::verify_receipt::receipt_item_model::ReceiptItemModel,
    domain::entities::{
        receipt_item::{
            ReceiptItem, SubscriptionType, VerifyPurchaseResult, VerifySubscriptionResult,
        },
        verification_result::ReceiptInfo,
    },
};

impl ReceiptItem {
    fn from_model(m: ReceiptItemModel) -> Self {
        Self {
            product_id: m.product_id,
            quantity: m.quantity,
            transaction_id: m.transaction_id,
            original_transaction_id: m.original_transaction_id,
            purchase_date: m.purchase_date_ms,
            original_purchase_date: m.original_purchase_date_ms,
            web_order_line_item_id: m.web_order_line_item_id,
            subscription_expiration_date: m.expires_date_ms,
            cancellation_date: m.cancellation_date_ms,
            is_trial_period: m.is_trial_period.unwrap_or(false),
            is_in_intro_offer_period: m.is_in_intro_offer_period.unwrap_or(false),
        }
    }
}

fn decode_items(entries: Option<&Value>) -> Option<Vec<ReceiptItem>> {
    let entries = entries?.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(
                |entry| match serde_json::from_value::<ReceiptItemModel>(entry.clone()) {
                    Ok(m) => Some(ReceiptItem::from_model(m)),
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping undecodable receipt item.");
                        None
                    }
                },
            )
            .collect(),
    )
}

/// Items of the `receipt.in_app` array. Empty if absent.
pub(crate) fn in_app_items(receipt_info: &ReceiptInfo) -> Vec<ReceiptItem> {
    decode_items(
        receipt_info
            .get(RECEIPT_KEY)
            .and_then(|receipt| receipt.get(IN_APP_KEY)),
    )
    .unwrap_or_default()
}

/// Items of the `latest_receipt_info` array, which is only present for
/// receipts containing auto-renewable subscriptions. Falls back to
/// `receipt.in_app`.
pub(crate) fn latest_receipt_items(receipt_info: &ReceiptInfo) -> Vec<ReceiptItem> {
    decode_items(receipt_info.get(LATEST_RECEIPT_INFO_KEY))
        .unwrap_or_else(|| in_app_items(receipt_info))
}

pub(crate) fn verify_purchase(
    product_id: &str,
    receipt_info: &ReceiptInfo,
) -> VerifyPurchaseResult {
    in_app_items(receipt_info)
        .into_iter()
        .find(|item| item.product_id == product_id && item.cancellation_date.is_none())
        .map_or(VerifyPurchaseResult::NotPurchased, VerifyPurchaseResult::Purchased)
}

pub(crate) fn verify_subscriptions(
    subscription_type: SubscriptionType,
    product_ids: &HashSet<String>,
    receipt_info: &ReceiptInfo,
    valid_until: DateTime<Utc>,
) -> VerifySubscriptionResult {
    let items = match subscription_type {
        SubscriptionType::AutoRenewable => latest_receipt_items(receipt_info),
        SubscriptionType::NonRenewing { .. } => in_app_items(receipt_info),
    };

    let mut dated_items: Vec<(DateTime<Utc>, ReceiptItem)> = items
        .into_iter()
        .filter(|item| product_ids.contains(&item.product_id))
        .filter(|item| item.cancellation_date.is_none())
        .filter_map(|item| {
            let expiry_date = match subscription_type {
                SubscriptionType::AutoRenewable => item.subscription_expiration_date?,
                SubscriptionType::NonRenewing { valid_duration } => {
                    item.purchase_date.checked_add_signed(valid_duration)?
                }
            };
            Some((expiry_date, item))
        })
        .collect();
    dated_items.sort_by(|a, b| b.0.cmp(&a.0));

    let Some(&(expiry_date, _)) = dated_items.first() else {
        return VerifySubscriptionResult::NotPurchased;
    };
    let items = dated_items.into_iter().map(|(_, item)| item).collect();
    if expiry_date > valid_until {
        VerifySubscriptionResult::Purchased { expiry_date, items }
    } else {
        VerifySubscriptionResult::Expired { expiry_date, items }
    }
}

pub(crate) fn verify_subscription(
    subscription_type: SubscriptionType,
    product_id: &str,
    receipt_info: &ReceiptInfo,
    valid_until: DateTime<Utc>,
) -> VerifySubscriptionResult {
    verify_subscriptions(
        subscription_type,
        &HashSet::from([product_id.to_string()]),
        receipt_info,
        valid_until,
    )
}
