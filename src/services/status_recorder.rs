use crate::error::Result;
use crate::models::{NormalizedPayment, PaymentResponse, PaymentStatusRecord, Provider};
use crate::repository::StatusRepositoryRef;
use chrono::Utc;
use tracing::{info, warn};

pub const FAILED_PAYMENT_ID_PREFIX: &str = "FAILED_PAYMENT_";
pub const FAILED_PAYMENT_STATUS: &str = "FAILED";

/// Writes the single status record a `create_payments` call leaves behind.
#[derive(Clone)]
pub struct StatusRecorder {
    provider: Provider,
    statuses: StatusRepositoryRef,
}

impl StatusRecorder {
    pub fn new(provider: Provider, statuses: StatusRepositoryRef) -> Self {
        Self { provider, statuses }
    }

    pub async fn record_success(&self, payment: &NormalizedPayment, response: &PaymentResponse) -> Result<()> {
        info!("Saving the new {} payment identification and status", self.provider);

        let record = PaymentStatusRecord::for_payment(
            payment,
            self.provider,
            response.payment_id.clone(),
            response.status.clone(),
        );
        self.statuses.save(record).await
    }

    pub async fn record_failure(&self, payment: &NormalizedPayment) -> Result<()> {
        warn!("Saving an entry for a {} payment that failed", self.provider);

        let record = PaymentStatusRecord::for_payment(
            payment,
            self.provider,
            failed_payment_id(),
            FAILED_PAYMENT_STATUS.to_string(),
        );
        self.statuses.save(record).await
    }
}

/// Marker id for a failed push; the timestamp keeps it unique.
pub fn failed_payment_id() -> String {
    format!("{}{}", FAILED_PAYMENT_ID_PREFIX, Utc::now().timestamp_millis())
}
