/// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
pub const VERIFY_RECEIPT_PRODUCTION_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub const VERIFY_RECEIPT_SANDBOX_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

pub(crate) const STATUS_KEY: &str = "status";
pub(crate) const RECEIPT_KEY: &str = "receipt";
pub(crate) const IN_APP_KEY: &str = "in_app";
pub(crate) const LATEST_RECEIPT_INFO_KEY: &str = "latest_receipt_info";
