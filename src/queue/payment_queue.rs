use crate::error::{BankingError, Result};
use crate::models::NormalizedPayment;
use tokio::sync::mpsc::{self, Receiver, Sender};

pub type PaymentReceiver = Receiver<NormalizedPayment>;

/// Publishing side of the payment queue.
#[derive(Clone)]
pub struct PaymentPublisher {
    sender: Sender<NormalizedPayment>,
}

impl PaymentPublisher {
    pub async fn publish(&self, payment: NormalizedPayment) -> Result<()> {
        self.sender.send(payment).await.map_err(|_| BankingError::QueueClosed)
    }
}

pub fn create_queue(buffer: usize) -> (PaymentPublisher, PaymentReceiver) {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    (PaymentPublisher { sender }, receiver)
}
