pub mod account;
pub mod batch;
pub mod deutsche;
pub mod payment;
pub mod provider;
pub mod revolut;
pub mod transaction;

pub use account::NormalizedAccount;
pub use batch::{BatchReceipt, PaymentBatch};
pub use payment::{NormalizedPayment, PaymentResponse, PaymentStatusRecord};
pub use provider::Provider;
pub use transaction::NormalizedTransaction;
