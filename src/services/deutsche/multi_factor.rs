use crate::app::config::DeutscheConfig;
use crate::error::Result;
use crate::models::deutsche::{
    ChallengeAnswer, ChallengeCreated, ChallengeOtp, SepaChallengeRequest, SepaPaymentRequestData,
    SEPA_CHALLENGE_DATA_TYPE, SEPA_CHALLENGE_REQUEST_TYPE,
};
use crate::services::gateway::checked_body;
use crate::utils::money::format_amount;
use reqwest::{Client, RequestBuilder};
use tracing::info;
use uuid::Uuid;

pub const OTP_HEADER: &str = "otp";
pub const IDEMPOTENCY_HEADER: &str = "idempotency-id";

/// Single-use headers authorising exactly one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorisationHeaders {
    pub otp: String,
    pub idempotency_id: String,
}

impl AuthorisationHeaders {
    pub fn apply(self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(OTP_HEADER, self.otp)
            .header(IDEMPOTENCY_HEADER, self.idempotency_id)
    }
}

/// Deutsche Bank step-up flow: open a challenge for the transfer, answer it,
/// and receive the OTP the payment endpoint demands.
pub struct MultiFactorService {
    client: Client,
    challenge_url: String,
    method: String,
    answer: String,
}

impl MultiFactorService {
    pub fn new(client: Client, config: &DeutscheConfig) -> Self {
        Self {
            client,
            challenge_url: config.challenge_url.trim_end_matches('/').to_string(),
            method: config.challenge_method.clone(),
            answer: config.challenge_response.clone(),
        }
    }

    /// Must be called once per payment; the idempotency id is per transfer.
    pub async fn prepare_authorisation(
        &self,
        token: &str,
        target_iban: &str,
        currency: &str,
        amount: &str,
    ) -> Result<AuthorisationHeaders> {
        let challenge = SepaChallengeRequest {
            method: self.method.clone(),
            request_type: SEPA_CHALLENGE_REQUEST_TYPE.to_string(),
            request_data: SepaPaymentRequestData {
                kind: SEPA_CHALLENGE_DATA_TYPE.to_string(),
                target_iban: target_iban.to_string(),
                amount_currency: currency.to_string(),
                amount_value: format_amount(amount),
            },
        };

        let response = self
            .client
            .post(&self.challenge_url)
            .bearer_auth(token)
            .json(&challenge)
            .send()
            .await?;
        let created: ChallengeCreated = serde_json::from_str(&checked_body(response, &self.challenge_url).await?)?;

        let answer_url = format!("{}/{}", self.challenge_url, created.id);
        let response = self
            .client
            .patch(&answer_url)
            .bearer_auth(token)
            .json(&ChallengeAnswer {
                response: self.answer.clone(),
            })
            .send()
            .await?;
        let solved: ChallengeOtp = serde_json::from_str(&checked_body(response, &answer_url).await?)?;

        info!("Obtained one-time authorisation for transfer to {}", target_iban);

        Ok(AuthorisationHeaders {
            otp: solved.otp,
            idempotency_id: Uuid::new_v4().to_string(),
        })
    }
}
