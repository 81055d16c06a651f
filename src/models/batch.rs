use crate::models::provider::Provider;
use serde::{Deserialize, Serialize};

/// A group of payments submitted together.
///
/// `processed_payments` is only written by batch reconciliation, which sets it
/// to the number of status records carrying this batch id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBatch {
    pub id: u64,
    pub total_payments: usize,
    pub processed_payments: usize,
}

impl PaymentBatch {
    pub fn is_complete(&self) -> bool {
        self.processed_payments >= self.total_payments
    }
}

/// Returned to callers once a batch has been queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReceipt {
    pub batch_id: u64,
    pub total_payments: usize,
    pub providers: Vec<Provider>,
}
