//! Persistence seams for status records and payment batches.

pub mod memory;

use crate::error::Result;
use crate::models::{PaymentBatch, PaymentStatusRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn save(&self, record: PaymentStatusRecord) -> Result<()>;
    async fn count_by_batch(&self, batch_id: u64) -> Result<usize>;
    async fn find_by_batch(&self, batch_id: u64) -> Result<Vec<PaymentStatusRecord>>;
    async fn find_all(&self) -> Result<Vec<PaymentStatusRecord>>;
}

#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Creates a batch expecting `total_payments` and assigns it a fresh id.
    async fn create(&self, total_payments: usize) -> Result<PaymentBatch>;
    async fn find(&self, batch_id: u64) -> Result<Option<PaymentBatch>>;
    async fn save(&self, batch: PaymentBatch) -> Result<()>;

    /// Opens a scope in which no other writer can touch the batch. Everything
    /// read and written while the scope is held behaves as one serializable
    /// transaction.
    async fn begin_serializable(&self, batch_id: u64) -> Result<SerializableScope>;
}

pub type StatusRepositoryRef = Arc<dyn StatusRepository>;
pub type BatchRepositoryRef = Arc<dyn BatchRepository>;

/// Held for the duration of a serializable unit of work on one batch.
pub struct SerializableScope {
    batch_id: u64,
    _guard: OwnedMutexGuard<()>,
}

impl SerializableScope {
    pub fn new(batch_id: u64, guard: OwnedMutexGuard<()>) -> Self {
        Self {
            batch_id,
            _guard: guard,
        }
    }

    pub fn batch_id(&self) -> u64 {
        self.batch_id
    }
}
