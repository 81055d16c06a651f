use crate::error::Result;
use crate::models::{PaymentBatch, PaymentStatusRecord};
use crate::repository::{BatchRepository, SerializableScope, StatusRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Append-only in-memory status log.
#[derive(Default, Clone)]
pub struct InMemoryStatusRepository {
    records: Arc<RwLock<Vec<PaymentStatusRecord>>>,
}

impl InMemoryStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusRepository for InMemoryStatusRepository {
    async fn save(&self, record: PaymentStatusRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn count_by_batch(&self, batch_id: u64) -> Result<usize> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.batch_id == Some(batch_id)).count())
    }

    async fn find_by_batch(&self, batch_id: u64) -> Result<Vec<PaymentStatusRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.batch_id == Some(batch_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<PaymentStatusRecord>> {
        Ok(self.records.read().await.clone())
    }
}

/// In-memory batch table with one exclusive lock per batch id.
#[derive(Clone)]
pub struct InMemoryBatchRepository {
    batches: Arc<DashMap<u64, PaymentBatch>>,
    locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryBatchRepository {
    fn default() -> Self {
        Self {
            batches: Arc::new(DashMap::new()),
            locks: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl InMemoryBatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BatchRepository for InMemoryBatchRepository {
    async fn create(&self, total_payments: usize) -> Result<PaymentBatch> {
        let batch = PaymentBatch {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            total_payments,
            processed_payments: 0,
        };
        // The lock exists before the batch becomes visible.
        self.locks.insert(batch.id, Arc::new(Mutex::new(())));
        self.batches.insert(batch.id, batch.clone());
        Ok(batch)
    }

    async fn find(&self, batch_id: u64) -> Result<Option<PaymentBatch>> {
        Ok(self.batches.get(&batch_id).map(|entry| entry.clone()))
    }

    async fn save(&self, batch: PaymentBatch) -> Result<()> {
        self.batches.insert(batch.id, batch);
        Ok(())
    }

    async fn begin_serializable(&self, batch_id: u64) -> Result<SerializableScope> {
        // Clone the lock out so the map shard is not held while waiting. Unknown
        // ids get a private lock that is never stored.
        let lock = self
            .locks
            .get(&batch_id)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| Arc::new(Mutex::new(())));
        Ok(SerializableScope::new(batch_id, lock.lock_owned().await))
    }
}
