use crate::app::config::GatewayConfig;
use crate::error::{BankingError, Result};
use crate::services::deutsche::multi_factor::MultiFactorService;
use crate::utils::identification::generate_identification;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, info};

/// What the step-up challenge needs to know about a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepUpTarget<'a> {
    pub iban: &'a str,
    pub currency: &'a str,
    pub amount: &'a str,
}

/// A provider payment body the gateway can push.
pub trait OutboundPayment: Serialize + Send + Sync {
    /// `Some` when the provider requires a step-up challenge before accepting
    /// this transfer.
    fn step_up_target(&self) -> Option<StepUpTarget<'_>>;

    /// Stores a synthesized request identification in the body.
    fn assign_identification(&mut self, identification: String);
}

pub fn build_client(config: &GatewayConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()
        .map_err(BankingError::Transport)
}

/// Returns the body of a successful response, mapping 4xx and 5xx statuses
/// into their error variants.
pub(crate) async fn checked_body(response: Response, url: &str) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_client_error() {
        return Err(BankingError::HttpClient {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }
    if status.is_server_error() {
        return Err(BankingError::HttpServer {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }

    Ok(body)
}

/// Some endpoints answer with a bare object where a list is expected.
pub fn wrap_singleton(body: &str) -> Cow<'_, str> {
    if body.trim_start().starts_with('[') {
        Cow::Borrowed(body)
    } else {
        Cow::Owned(format!("[{}]", body))
    }
}

pub struct TransportGateway {
    client: Client,
    max_request_id_length: usize,
    multi_factor: Option<MultiFactorService>,
}

impl TransportGateway {
    pub fn new(client: Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            max_request_id_length: config.max_request_id_length,
            multi_factor: None,
        }
    }

    pub fn with_multi_factor(mut self, multi_factor: MultiFactorService) -> Self {
        self.multi_factor = Some(multi_factor);
        self
    }

    pub async fn retrieve<T: DeserializeOwned>(&self, token: &str, url: &str) -> Result<Vec<T>> {
        debug!("Retrieving records from {}", url);

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let body = checked_body(response, url).await?;

        Ok(serde_json::from_str(&wrap_singleton(&body))?)
    }

    /// Pushes payments one at a time in input order. The first failing request
    /// aborts the whole push.
    pub async fn push_sequential<P, R>(&self, token: &str, url: &str, payments: Vec<P>) -> Result<Vec<R>>
    where
        P: OutboundPayment,
        R: DeserializeOwned,
    {
        let mut responses = Vec::with_capacity(payments.len());

        for mut payment in payments {
            let mut request = self.client.post(url).bearer_auth(token);

            if let Some(target) = payment.step_up_target() {
                let multi_factor = self
                    .multi_factor
                    .as_ref()
                    .ok_or_else(|| BankingError::MissingStepUp(target.iban.to_string()))?;
                let headers = multi_factor
                    .prepare_authorisation(token, target.iban, target.currency, target.amount)
                    .await?;
                request = headers.apply(request);
            } else {
                let identification = generate_identification(self.max_request_id_length, &mut rand::thread_rng());
                payment.assign_identification(identification);
            }

            info!("Processing payment to {}", url);

            let response = request.json(&payment).send().await?;
            let body = checked_body(response, url).await?;
            responses.push(serde_json::from_str(&body)?);
        }

        Ok(responses)
    }
}
