pub mod aggregation;
pub mod batch_submission;
pub mod consumer;
pub mod deutsche;
pub mod gateway;
mod payment_push;
pub mod reconciliation;
pub mod registry;
pub mod revolut;
pub mod status_recorder;
pub mod token_service;

pub use aggregation::AggregationService;
pub use batch_submission::BatchSubmissionService;
pub use consumer::{DispatchOutcome, MessageOutcome, PaymentConsumer};
pub use gateway::TransportGateway;
pub use reconciliation::BatchReconciler;
pub use registry::{AccountService, BankingServiceRegistry, TransactionService};
pub use status_recorder::{StatusRecorder, FAILED_PAYMENT_ID_PREFIX, FAILED_PAYMENT_STATUS};
pub use token_service::TokenService;
