use crate::error::BankingError;
use crate::models::{NormalizedPayment, PaymentBatch};
use crate::queue::payment_queue::PaymentReceiver;
use crate::services::reconciliation::BatchReconciler;
use crate::services::registry::BankingServiceRegistry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// What happened to one consumed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The provider service ran; success or recorded failure is in the
    /// status records.
    Dispatched,
    /// The provider service raised an error that was logged and dropped.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOutcome {
    pub dispatch: DispatchOutcome,
    pub batch: Option<PaymentBatch>,
}

/// Consumes individual payment messages. Delivery is at most once: a failed
/// dispatch is logged and never re-queued.
pub struct PaymentConsumer {
    registry: Arc<BankingServiceRegistry>,
    reconciler: BatchReconciler,
}

impl PaymentConsumer {
    pub fn new(registry: Arc<BankingServiceRegistry>, reconciler: BatchReconciler) -> Self {
        Self { registry, reconciler }
    }

    pub async fn on_message(&self, payment: NormalizedPayment) -> MessageOutcome {
        info!("Consumer received: {}", payment);

        let batch_id = payment.batch_id;
        let to_process = [payment];
        let result = match to_process[0].bank {
            Some(bank) => self.registry.transaction_service(bank).create_payments(&to_process).await,
            None => Err(BankingError::unsupported(Vec::<String>::new())),
        };
        let dispatch = match result {
            Ok(_) => DispatchOutcome::Dispatched,
            Err(e) => {
                error!("Could not process {} because {}", to_process[0], e);
                DispatchOutcome::Failed(e.to_string())
            }
        };

        // Runs after both outcomes; a reconciliation failure never masks the
        // dispatch result.
        let batch = match batch_id {
            Some(batch_id) => match self.reconciler.update_batch_counters(batch_id).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!("Could not reconcile batch {}: {}", batch_id, e);
                    None
                }
            },
            None => {
                warn!("Payment message carries no batch id, skipping reconciliation");
                None
            }
        };

        MessageOutcome { dispatch, batch }
    }

    /// Processes messages until the queue closes.
    pub async fn process_payments_async(&self, receiver: Arc<Mutex<PaymentReceiver>>) {
        loop {
            let next = receiver.lock().await.recv().await;
            match next {
                Some(payment) => {
                    self.on_message(payment).await;
                }
                None => break,
            }
        }
    }

    /// Starts `workers` consumers sharing one receiver. Messages of the same
    /// batch may be handled concurrently by different workers.
    pub fn spawn_workers(self: &Arc<Self>, receiver: PaymentReceiver, workers: usize) -> Vec<JoinHandle<()>> {
        let receiver = Arc::new(Mutex::new(receiver));
        let workers = workers.max(1);
        info!("Starting {} payment consumer workers", workers);

        (0..workers)
            .map(|worker| {
                let consumer = Arc::clone(self);
                let receiver = Arc::clone(&receiver);
                tokio::spawn(async move {
                    consumer.process_payments_async(receiver).await;
                    info!("Payment consumer worker {} stopped", worker);
                })
            })
            .collect()
    }
}
