pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod verify_receipt_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt {
            pub(crate) mod receipt_item_model;
            pub(crate) mod verify_receipt_request_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod apple_receipt_validator_impl;
        pub(crate) mod in_app_receipt_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod receipt_item;
        pub mod receipt_status;
        pub mod receipt_validator_config;
        pub mod store_product;
        pub mod verification_result;
        pub mod verify_receipt_service;
    }
    pub mod repositories {
        pub mod completion;
        pub mod purchase_engine;
        pub mod receipt_validator;
    }
}

pub mod constants;
pub mod errors;
pub mod secrets;
pub mod util;

pub use data::datasources::verify_receipt_datasource::{
    VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
};
pub use data::repositories::apple_receipt_validator_impl::AppleReceiptValidator;
