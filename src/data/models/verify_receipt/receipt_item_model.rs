use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst, TimestampMilliSeconds};

fn default_quantity() -> u32 {
    1
}

/// Entry of the `in_app` or `latest_receipt_info` arrays of a verifyReceipt
/// response. Apple encodes numbers and booleans as strings in these entries.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptItemModel {
    /// The unique identifier of the product purchased.
    pub(crate) product_id: String,
    /// The number of consumable products purchased.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    #[serde(default = "default_quantity")]
    pub(crate) quantity: u32,
    /// A unique identifier for a transaction such as a purchase, restore, or
    /// renewal.
    pub(crate) transaction_id: String,
    /// The transaction identifier of the original purchase.
    pub(crate) original_transaction_id: String,
    /// The time the App Store charged the user's account for a purchase or
    /// renewal, in UNIX epoch time format, in milliseconds.
    #[serde_as(as = "TimestampMilliSeconds<String>")]
    pub(crate) purchase_date_ms: DateTime<Utc>,
    /// The time of the original app purchase, in UNIX epoch time format, in
    /// milliseconds.
    #[serde_as(as = "TimestampMilliSeconds<String>")]
    pub(crate) original_purchase_date_ms: DateTime<Utc>,
    /// A unique identifier for purchase events across devices, including
    /// subscription-renewal events.
    #[serde(default)]
    pub(crate) web_order_line_item_id: Option<String>,
    /// The time a subscription expires or when it will renew, in UNIX epoch
    /// time format, in milliseconds.
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    #[serde(default)]
    pub(crate) expires_date_ms: Option<DateTime<Utc>>,
    /// The time Apple customer support canceled a transaction, or the time an
    /// auto-renewable subscription plan was upgraded, in UNIX epoch time
    /// format, in milliseconds.
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    #[serde(default)]
    pub(crate) cancellation_date_ms: Option<DateTime<Utc>>,
    /// An indicator of whether a subscription is in the free trial period.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub(crate) is_trial_period: Option<bool>,
    /// An indicator of whether an auto-renewable subscription is in the
    /// introductory price period.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub(crate) is_in_intro_offer_period: Option<bool>,
}
