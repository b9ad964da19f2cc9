use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;

use crate::{
    constants::STATUS_KEY,
    data::{
        datasources::verify_receipt_datasource::{
            VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
        },
        models::verify_receipt::verify_receipt_request_model::VerifyReceiptRequestModel,
    },
    domain::{
        entities::{
            receipt_status::ReceiptStatus,
            receipt_validator_config::ReceiptValidatorConfig,
            verification_result::{ReceiptInfo, VerificationResult},
            verify_receipt_service::{VerifyReceiptEndpoints, VerifyReceiptService},
        },
        repositories::{completion::Completion, receipt_validator::ReceiptValidator},
    },
    errors::ReceiptError,
};

/// Validates receipts against Apple's verifyReceipt service.
///
/// Starts on the configured service (production by default) and switches to
/// the sandbox, for good, the first time production reports a sandbox receipt.
///
/// At most one validation is in flight per validator. Starting a new one
/// cancels the previous one, and dropping the validator cancels the current
/// one. Completions of cancelled validations are never called.
///
/// `validate` spawns onto the current tokio runtime.
pub struct AppleReceiptValidator<D: VerifyReceiptDatasource = VerifyReceiptDatasourceImpl> {
    shared: Arc<Shared<D>>,
}

struct Shared<D> {
    datasource: D,
    endpoints: VerifyReceiptEndpoints,
    service: Mutex<VerifyReceiptService>,
    shared_secret: Option<String>,
    exclude_old_transactions: bool,
    in_flight: Mutex<InFlight>,
}

#[derive(Default)]
struct InFlight {
    /// Bumped whenever the current validation is superseded or cancelled.
    generation: u64,
    handle: Option<AbortHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppleReceiptValidator<VerifyReceiptDatasourceImpl> {
    pub fn new(config: ReceiptValidatorConfig) -> Self {
        Self::with_datasource(config, VerifyReceiptDatasourceImpl::new())
    }
}

impl<D: VerifyReceiptDatasource> AppleReceiptValidator<D> {
    pub fn with_datasource(config: ReceiptValidatorConfig, datasource: D) -> Self {
        Self {
            shared: Arc::new(Shared {
                datasource,
                endpoints: config.endpoints,
                service: Mutex::new(config.service),
                shared_secret: config.shared_secret.filter(|secret| !secret.is_empty()),
                exclude_old_transactions: config.exclude_old_transactions,
                in_flight: Mutex::new(InFlight::default()),
            }),
        }
    }

    /// The service the next request will be sent to.
    pub fn service(&self) -> VerifyReceiptService {
        self.shared.service()
    }

    fn cancel_in_flight(in_flight: &mut InFlight) -> u64 {
        in_flight.generation = in_flight.generation.wrapping_add(1);
        if let Some(handle) = in_flight.handle.take() {
            tracing::debug!("Cancelling outstanding verifyReceipt request.");
            handle.abort();
        }
        in_flight.generation
    }
}

impl<D: VerifyReceiptDatasource> ReceiptValidator for AppleReceiptValidator<D> {
    fn validate(&self, receipt_data: Vec<u8>, completion: Completion<VerificationResult>) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                completion(VerificationResult::unverified(
                    ReceiptInfo::new(),
                    ReceiptError::NetworkError(Box::new(e)),
                ));
                return;
            }
        };

        let mut in_flight = lock(&self.shared.in_flight);
        let generation = Self::cancel_in_flight(&mut in_flight);
        let shared = Arc::clone(&self.shared);
        let task = runtime.spawn(async move {
            let result = shared.verify(&receipt_data, generation).await;
            if shared.finish(generation) {
                completion(result);
            }
        });
        in_flight.handle = Some(task.abort_handle());
    }
}

impl<D: VerifyReceiptDatasource> Drop for AppleReceiptValidator<D> {
    fn drop(&mut self) {
        Self::cancel_in_flight(&mut lock(&self.shared.in_flight));
    }
}

impl<D: VerifyReceiptDatasource> Shared<D> {
    fn service(&self) -> VerifyReceiptService {
        *lock(&self.service)
    }

    /// Moves later validations to the sandbox, unless this validation has
    /// been superseded. Returns `false` if it was superseded.
    fn redirect_to_sandbox(&self, generation: u64) -> bool {
        let in_flight = lock(&self.in_flight);
        if in_flight.generation != generation {
            return false;
        }
        lock(&self.service).redirect_to_sandbox();
        true
    }

    /// Releases the in-flight slot. Returns `false` if the validation was
    /// superseded, in which case its result must be discarded.
    fn finish(&self, generation: u64) -> bool {
        let mut in_flight = lock(&self.in_flight);
        if in_flight.generation != generation {
            tracing::debug!("Discarding result of superseded verifyReceipt request.");
            return false;
        }
        in_flight.handle = None;
        true
    }

    async fn verify(&self, receipt_data: &[u8], generation: u64) -> VerificationResult {
        let mut service = self.service();
        loop {
            let body = match VerifyReceiptRequestModel::new(
                receipt_data,
                self.shared_secret.as_deref(),
                self.exclude_old_transactions,
            )
            .to_json()
            {
                Ok(body) => body,
                Err(e) => {
                    return VerificationResult::unverified(
                        ReceiptInfo::new(),
                        ReceiptError::RequestBodyEncodeFailed(e),
                    )
                }
            };

            tracing::debug!(%service, "Sending receipt to verifyReceipt.");
            let data = match self
                .datasource
                .post_receipt(self.endpoints.url(service), body)
                .await
            {
                Ok(data) => data,
                Err(e) => return VerificationResult::unverified(ReceiptInfo::new(), e),
            };

            let (receipt_info, status) = match decode_response(data) {
                Ok(decoded) => decoded,
                Err(result) => return result,
            };
            tracing::debug!(%service, status = status.code(), "verifyReceipt responded.");

            // A sandbox receipt sent to production. Resend it to the sandbox;
            // a second such answer, from the sandbox, is final.
            if status == ReceiptStatus::TestReceipt && service.redirect_to_sandbox() {
                if !self.redirect_to_sandbox(generation) {
                    return VerificationResult::from_status(receipt_info, status);
                }
                tracing::info!("Sandbox receipt sent to production, retrying against sandbox.");
                continue;
            }
            return VerificationResult::from_status(receipt_info, status);
        }
    }
}

fn decode_response(data: Vec<u8>) -> Result<(ReceiptInfo, ReceiptStatus), VerificationResult> {
    if data.is_empty() {
        return Err(VerificationResult::unverified(
            ReceiptInfo::new(),
            ReceiptError::MissingRemoteData,
        ));
    }
    let receipt_info = match serde_json::from_slice::<serde_json::Value>(&data) {
        Ok(serde_json::Value::Object(receipt_info)) => receipt_info,
        _ => {
            return Err(VerificationResult::unverified(
                ReceiptInfo::new(),
                ReceiptError::JsonDecodeFailed(data),
            ))
        }
    };
    match receipt_info.get(STATUS_KEY).and_then(serde_json::Value::as_i64) {
        Some(code) => Ok((receipt_info, ReceiptStatus::from_code(code))),
        None => Err(VerificationResult::unverified(
            receipt_info,
            ReceiptError::InvalidStatus(None),
        )),
    }
}
