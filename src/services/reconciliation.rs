use crate::error::Result;
use crate::models::PaymentBatch;
use crate::repository::{BatchRepositoryRef, StatusRepositoryRef};
use tracing::{debug, info};

/// Keeps a batch's processed counter equal to its number of status records.
///
/// The counter is recomputed rather than incremented, so running the same
/// reconciliation twice, or for a redelivered message, gives the same result.
/// Each recount scans the batch's records, which costs O(batch size) per
/// message.
#[derive(Clone)]
pub struct BatchReconciler {
    batches: BatchRepositoryRef,
    statuses: StatusRepositoryRef,
}

impl BatchReconciler {
    pub fn new(batches: BatchRepositoryRef, statuses: StatusRepositoryRef) -> Self {
        Self { batches, statuses }
    }

    /// Returns the updated batch, or `None` when the batch does not exist.
    pub async fn update_batch_counters(&self, batch_id: u64) -> Result<Option<PaymentBatch>> {
        let scope = self.batches.begin_serializable(batch_id).await?;

        let Some(mut batch) = self.batches.find(scope.batch_id()).await? else {
            debug!("Batch {} not found, nothing to reconcile", batch_id);
            return Ok(None);
        };

        batch.processed_payments = self.statuses.count_by_batch(batch.id).await?;
        self.batches.save(batch.clone()).await?;
        drop(scope);

        info!(
            "Updated processed payments counter for batch {}: {}/{}",
            batch.id, batch.processed_payments, batch.total_payments
        );
        Ok(Some(batch))
    }
}
