#![allow(dead_code)]

use bank_orchestrator::app::bootstrap::build_registry;
use bank_orchestrator::app::config::Config;
use bank_orchestrator::models::{NormalizedPayment, Provider};
use bank_orchestrator::repository::memory::{InMemoryBatchRepository, InMemoryStatusRepository};
use bank_orchestrator::services::BankingServiceRegistry;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REVOLUT_IBAN: &str = "GB33BUKB20201555555555";
pub const DEUTSCHE_IBAN: &str = "DE89370400440532013000";
pub const CREDITOR_IBAN: &str = "DE02120300000000202051";

/// Both providers served from one mock server under `/revolut` and
/// `/deutsche`.
pub struct Harness {
    pub server: MockServer,
    pub config: Config,
    pub statuses: InMemoryStatusRepository,
    pub batches: InMemoryBatchRepository,
    pub registry: Arc<BankingServiceRegistry>,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = config_for(&server.uri());
        let statuses = InMemoryStatusRepository::new();
        let batches = InMemoryBatchRepository::new();
        let registry = build_registry(&config, Arc::new(statuses.clone())).unwrap();

        Self {
            server,
            config,
            statuses,
            batches,
            registry,
        }
    }

    pub async fn mount_token(&self, provider: Provider, expires_in: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/token", prefix(provider))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": format!("{}-token", prefix(provider)),
                "token_type": "Bearer",
                "expires_in": expires_in,
            })))
            .mount(&self.server)
            .await;
    }

    /// Challenge creation and answer for the Deutsche Bank step-up flow.
    pub async fn mount_challenge(&self, otp: &str) {
        Mock::given(method("POST"))
            .and(path("/deutsche/challenges"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "challenge-1" })))
            .mount(&self.server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/deutsche/challenges/challenge-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "otp": otp })))
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, request_path: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == request_path)
            .collect()
    }
}

pub fn prefix(provider: Provider) -> &'static str {
    match provider {
        Provider::Revolut => "revolut",
        Provider::Deutsche => "deutsche",
    }
}

pub fn config_for(base: &str) -> Config {
    let mut config = Config::default();

    config.revolut.token_url = format!("{}/revolut/token", base);
    config.revolut.client_id = "revolut-client".to_string();
    config.revolut.refresh_token = "revolut-refresh".to_string();
    config.revolut.client_assertion = "signed-jwt".to_string();
    config.revolut.account_url = format!("{}/revolut/accounts", base);
    config.revolut.transaction_url = format!("{}/revolut/transactions", base);
    config.revolut.payment_url = format!("{}/revolut/pay", base);

    config.deutsche.token_url = format!("{}/deutsche/token", base);
    config.deutsche.client_id = "deutsche-client".to_string();
    config.deutsche.client_secret = "deutsche-secret".to_string();
    config.deutsche.refresh_token = "deutsche-refresh".to_string();
    config.deutsche.account_url = format!("{}/deutsche/accounts", base);
    config.deutsche.transaction_url = format!("{}/deutsche/transactions", base);
    config.deutsche.payment_url = format!("{}/deutsche/payments", base);
    config.deutsche.challenge_url = format!("{}/deutsche/challenges", base);

    config.consumer.workers = 2;
    config
}

pub fn revolut_payment(amount: &str) -> NormalizedPayment {
    let mut info = HashMap::new();
    info.insert("reference".to_string(), "invoice 17".to_string());
    info.insert("counterparty".to_string(), "cp-1".to_string());

    NormalizedPayment {
        source_account: Some(REVOLUT_IBAN.to_string()),
        destination_account: Some("acc-2".to_string()),
        amount: Some(Decimal::from_str(amount).unwrap()),
        currency: Some("EUR".to_string()),
        batch_id: None,
        bank: Some(Provider::Revolut),
        additional_info: Some(info),
    }
}

pub fn deutsche_payment(amount: &str) -> NormalizedPayment {
    let mut info = HashMap::new();
    info.insert("creditorName".to_string(), "Jane Doe".to_string());

    NormalizedPayment {
        source_account: Some(DEUTSCHE_IBAN.to_string()),
        destination_account: Some(CREDITOR_IBAN.to_string()),
        amount: Some(Decimal::from_str(amount).unwrap()),
        currency: Some("EUR".to_string()),
        batch_id: None,
        bank: Some(Provider::Deutsche),
        additional_info: Some(info),
    }
}
