use crate::error::{BankingError, Result};
use crate::models::{BatchReceipt, NormalizedPayment, PaymentBatch, PaymentStatusRecord, Provider};
use crate::queue::payment_queue::PaymentPublisher;
use crate::repository::{BatchRepositoryRef, StatusRepositoryRef};
use crate::services::aggregation::validate_providers;
use std::collections::HashMap;
use tracing::info;

/// Accepts a batch of payments for asynchronous submission.
#[derive(Clone)]
pub struct BatchSubmissionService {
    batches: BatchRepositoryRef,
    statuses: StatusRepositoryRef,
    publisher: PaymentPublisher,
}

impl BatchSubmissionService {
    pub fn new(batches: BatchRepositoryRef, statuses: StatusRepositoryRef, publisher: PaymentPublisher) -> Self {
        Self {
            batches,
            statuses,
            publisher,
        }
    }

    /// Creates the batch, stamps every payment with its id and provider, and
    /// queues the payments one message each.
    pub async fn submit(&self, params: HashMap<String, Vec<NormalizedPayment>>) -> Result<BatchReceipt> {
        let mut providers = validate_providers(&params)?;
        providers.sort();

        let total: usize = params.values().map(Vec::len).sum();
        let batch = self.batches.create(total).await?;
        info!("Created batch {} expecting {} payments", batch.id, total);

        for (key, payments) in params {
            let provider: Provider = key.parse()?;
            for mut payment in payments {
                payment.bank = Some(provider);
                payment.batch_id = Some(batch.id);
                self.publisher.publish(payment).await?;
            }
        }

        Ok(BatchReceipt {
            batch_id: batch.id,
            total_payments: total,
            providers,
        })
    }

    pub async fn batch_status(&self, batch_id: u64) -> Result<(PaymentBatch, Vec<PaymentStatusRecord>)> {
        let batch = self
            .batches
            .find(batch_id)
            .await?
            .ok_or_else(|| BankingError::Repository(format!("batch {} not found", batch_id)))?;
        let records = self.statuses.find_by_batch(batch_id).await?;
        Ok((batch, records))
    }
}
