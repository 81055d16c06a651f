use crate::models::provider::Provider;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BankingError>;

#[derive(Error, Debug)]
pub enum BankingError {
    #[error("Requested services {requested:?} do not correspond to supported services of {supported:?}")]
    UnsupportedProvider {
        requested: Vec<String>,
        supported: Vec<Provider>,
    },

    #[error("{payment} has no {field} specified")]
    MissingPaymentData { payment: String, field: String },

    #[error("Could not fetch {provider} access token: {reason}")]
    TokenFetch { provider: Provider, reason: String },

    #[error("HTTP {status} from {url}: {body}")]
    HttpClient { status: u16, url: String, body: String },

    #[error("HTTP {status} from {url}: {body}")]
    HttpServer { status: u16, url: String, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Payment to {0} requires step-up authorisation but no multi-factor service is configured")]
    MissingStepUp(String),

    #[error("Payment queue is closed")]
    QueueClosed,

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BankingError {
    pub fn unsupported<I, S>(requested: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BankingError::UnsupportedProvider {
            requested: requested.into_iter().map(Into::into).collect(),
            supported: Provider::ALL.to_vec(),
        }
    }

    pub fn missing(payment: impl Into<String>, field: impl Into<String>) -> Self {
        BankingError::MissingPaymentData {
            payment: payment.into(),
            field: field.into(),
        }
    }

    /// Failures of the HTTP exchange itself. On the payment push path these are
    /// recorded as a failed status instead of being surfaced.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            BankingError::HttpClient { .. }
                | BankingError::HttpServer { .. }
                | BankingError::Transport(_)
        )
    }

    /// Push failures that leave a failed status record behind. A response that
    /// cannot be decoded may belong to an accepted transfer, so it is recorded
    /// like a transport failure.
    pub fn is_recorded_push_failure(&self) -> bool {
        self.is_transport_failure() || matches!(self, BankingError::Decode(_))
    }
}
