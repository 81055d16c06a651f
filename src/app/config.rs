use crate::error::{BankingError, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub revolut: RevolutConfig,
    pub deutsche: DeutscheConfig,
    pub gateway: GatewayConfig,
    pub consumer: ConsumerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RevolutConfig {
    pub token_url: String,
    pub client_id: String,
    pub refresh_token: String,
    pub client_assertion_type: String,
    pub client_assertion: String,
    pub account_url: String,
    pub transaction_url: String,
    pub payment_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeutscheConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub account_url: String,
    pub transaction_url: String,
    pub payment_url: String,
    pub challenge_url: String,
    pub challenge_method: String,
    pub challenge_response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub max_request_id_length: usize,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    pub workers: usize,
    pub queue_buffer_size: usize,
}

impl Default for RevolutConfig {
    fn default() -> Self {
        Self {
            token_url: "https://sandbox-b2b.revolut.com/api/1.0/auth/token".to_string(),
            client_id: String::new(),
            refresh_token: String::new(),
            client_assertion_type: "urn:ietf:params:oauth:client-assertion-type:jwt-bearer".to_string(),
            client_assertion: String::new(),
            account_url: "https://sandbox-b2b.revolut.com/api/1.0/accounts".to_string(),
            transaction_url: "https://sandbox-b2b.revolut.com/api/1.0/transactions".to_string(),
            payment_url: "https://sandbox-b2b.revolut.com/api/1.0/pay".to_string(),
        }
    }
}

impl Default for DeutscheConfig {
    fn default() -> Self {
        Self {
            token_url: "https://simulator-api.db.com/gw/oidc/token".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            account_url: "https://simulator-api.db.com/gw/dbapi/banking/cashAccounts/v2".to_string(),
            transaction_url: "https://simulator-api.db.com/gw/dbapi/banking/transactions/v2".to_string(),
            payment_url: "https://simulator-api.db.com/gw/dbapi/paymentInitiation/payments/v1/instantSepaCreditTransfers"
                .to_string(),
            challenge_url: "https://simulator-api.db.com/gw/dbapi/others/transactionAuthorization/v1/challenges"
                .to_string(),
            challenge_method: "MTAN".to_string(),
            challenge_response: "123456".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_request_id_length: 40,
            request_timeout_ms: 5000,
        }
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            queue_buffer_size: 1000,
        }
    }
}

fn var_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let revolut = RevolutConfig::default();
        let deutsche = DeutscheConfig::default();
        let gateway = GatewayConfig::default();
        let consumer = ConsumerConfig::default();

        Self {
            revolut: RevolutConfig {
                token_url: var_or("REVOLUT_TOKEN_URL", revolut.token_url),
                client_id: var_or("REVOLUT_CLIENT_ID", revolut.client_id),
                refresh_token: var_or("REVOLUT_REFRESH_TOKEN", revolut.refresh_token),
                client_assertion_type: var_or("REVOLUT_CLIENT_ASSERTION_TYPE", revolut.client_assertion_type),
                client_assertion: var_or("REVOLUT_CLIENT_ASSERTION", revolut.client_assertion),
                account_url: var_or("REVOLUT_ACCOUNT_URL", revolut.account_url),
                transaction_url: var_or("REVOLUT_TRANSACTION_URL", revolut.transaction_url),
                payment_url: var_or("REVOLUT_PAYMENT_URL", revolut.payment_url),
            },
            deutsche: DeutscheConfig {
                token_url: var_or("DEUTSCHE_TOKEN_URL", deutsche.token_url),
                client_id: var_or("DEUTSCHE_CLIENT_ID", deutsche.client_id),
                client_secret: var_or("DEUTSCHE_CLIENT_SECRET", deutsche.client_secret),
                refresh_token: var_or("DEUTSCHE_REFRESH_TOKEN", deutsche.refresh_token),
                account_url: var_or("DEUTSCHE_ACCOUNT_URL", deutsche.account_url),
                transaction_url: var_or("DEUTSCHE_TRANSACTION_URL", deutsche.transaction_url),
                payment_url: var_or("DEUTSCHE_PAYMENT_URL", deutsche.payment_url),
                challenge_url: var_or("DEUTSCHE_CHALLENGE_URL", deutsche.challenge_url),
                challenge_method: var_or("DEUTSCHE_CHALLENGE_METHOD", deutsche.challenge_method),
                challenge_response: var_or("DEUTSCHE_CHALLENGE_RESPONSE", deutsche.challenge_response),
            },
            gateway: GatewayConfig {
                max_request_id_length: parsed_or("MAX_REQUEST_ID_LENGTH", gateway.max_request_id_length),
                request_timeout_ms: parsed_or("REQUEST_TIMEOUT_MS", gateway.request_timeout_ms),
            },
            consumer: ConsumerConfig {
                workers: parsed_or("CONSUMER_WORKERS", consumer.workers),
                queue_buffer_size: parsed_or("QUEUE_BUFFER_SIZE", consumer.queue_buffer_size),
            },
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BankingError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BankingError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [revolut]
            client_id = "abc"

            [gateway]
            max_request_id_length = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.revolut.client_id, "abc");
        assert_eq!(config.revolut.payment_url, RevolutConfig::default().payment_url);
        assert_eq!(config.gateway.max_request_id_length, 12);
        assert_eq!(config.gateway.request_timeout_ms, 5000);
        assert_eq!(config.deutsche.challenge_method, "MTAN");
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[consumer]\nworkers = 3\nqueue_buffer_size = 16").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.consumer.workers, 3);
        assert_eq!(config.consumer.queue_buffer_size, 16);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Config::from_toml_str("[gateway]\nmax_request_id_length = \"many\"").unwrap_err();
        assert!(matches!(err, BankingError::Config(_)));
    }
}
