/// Classification of the `status` field returned by verifyReceipt.
///
/// https://developer.apple.com/documentation/appstorereceipts/status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// The receipt is valid.
    Valid,
    /// The request to the App Store was not made using the HTTP POST request
    /// method.
    JsonNotReadable,
    /// The data in the receipt-data property was malformed or the service
    /// experienced a temporary issue. Try again.
    MalformedOrMissingReceiptData,
    /// The receipt could not be authenticated.
    ReceiptCouldNotBeAuthenticated,
    /// The shared secret you provided does not match the shared secret on file
    /// for your account.
    SecretNotMatching,
    /// The receipt server was temporarily unable to provide the receipt. Try
    /// again.
    ReceiptServerUnavailable,
    /// This receipt is valid but the subscription has expired.
    SubscriptionExpired,
    /// This receipt is from the test environment, but it was sent to the
    /// production environment for verification.
    TestReceipt,
    /// This receipt is from the production environment, but it was sent to
    /// the test environment for verification.
    ProductionEnvironment,
    /// Internal data access error. Try again later.
    InternalDataAccessError,
    /// The user account cannot be found or has been deleted.
    UserAccountNotFound,
    /// Internal data access error in the 21100-21199 range.
    InternalError(i64),

    Unknown(i64),
}

impl ReceiptStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ReceiptStatus::Valid,
            21000 => ReceiptStatus::JsonNotReadable,
            21002 => ReceiptStatus::MalformedOrMissingReceiptData,
            21003 => ReceiptStatus::ReceiptCouldNotBeAuthenticated,
            21004 => ReceiptStatus::SecretNotMatching,
            21005 => ReceiptStatus::ReceiptServerUnavailable,
            21006 => ReceiptStatus::SubscriptionExpired,
            21007 => ReceiptStatus::TestReceipt,
            21008 => ReceiptStatus::ProductionEnvironment,
            21009 => ReceiptStatus::InternalDataAccessError,
            21010 => ReceiptStatus::UserAccountNotFound,
            21100..=21199 => ReceiptStatus::InternalError(code),
            _ => ReceiptStatus::Unknown(code),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ReceiptStatus::Valid => 0,
            ReceiptStatus::JsonNotReadable => 21000,
            ReceiptStatus::MalformedOrMissingReceiptData => 21002,
            ReceiptStatus::ReceiptCouldNotBeAuthenticated => 21003,
            ReceiptStatus::SecretNotMatching => 21004,
            ReceiptStatus::ReceiptServerUnavailable => 21005,
            ReceiptStatus::SubscriptionExpired => 21006,
            ReceiptStatus::TestReceipt => 21007,
            ReceiptStatus::ProductionEnvironment => 21008,
            ReceiptStatus::InternalDataAccessError => 21009,
            ReceiptStatus::UserAccountNotFound => 21010,
            ReceiptStatus::InternalError(code) | ReceiptStatus::Unknown(code) => *code,
        }
    }

    /// Whether the purchase flow may be completed with this receipt.
    pub fn is_valid(&self) -> bool {
        *self == ReceiptStatus::Valid
    }
}
