use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::errors::ReceiptError;

#[async_trait]
pub trait VerifyReceiptDatasource: Send + Sync + 'static {
    /// verifyReceipt:
    /// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
    ///
    /// url:
    ///   The production or sandbox verifyReceipt URL.
    /// body:
    ///   The JSON-encoded request body.
    ///
    /// Returns the raw response body, which may be empty. Only transport
    /// failures are errors.
    async fn post_receipt(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, ReceiptError>;
}

#[derive(Debug, Clone)]
pub struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn post_receipt(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, ReceiptError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url, error = %e, "verifyReceipt callout failed to send.");
                ReceiptError::NetworkError(Box::new(e))
            })?;

        // verifyReceipt reports failures through the body's status field, so
        // the HTTP status is only logged.
        if !response.status().is_success() {
            tracing::warn!(
                url,
                status = %response.status(),
                "verifyReceipt returned with non-200 status code."
            );
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(url, error = %e, "Failed to read verifyReceipt response body.");
            ReceiptError::NetworkError(Box::new(e))
        })?;
        Ok(bytes.to_vec())
    }
}

impl VerifyReceiptDatasourceImpl {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for VerifyReceiptDatasourceImpl {
    fn default() -> Self {
        Self::new()
    }
}
