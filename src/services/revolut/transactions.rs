use crate::error::Result;
use crate::models::revolut::{RevolutPaymentResponse, RevolutTransaction};
use crate::models::{NormalizedPayment, NormalizedTransaction, PaymentResponse, Provider};
use crate::services::gateway::TransportGateway;
use crate::services::payment_push::{push_and_record, PushContext};
use crate::services::revolut::mapper;
use crate::services::status_recorder::StatusRecorder;
use crate::services::token_service::TokenService;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct RevolutTransactionService {
    tokens: Arc<TokenService>,
    gateway: Arc<TransportGateway>,
    recorder: StatusRecorder,
    transaction_url: String,
    payment_url: String,
}

impl RevolutTransactionService {
    pub fn new(
        tokens: Arc<TokenService>,
        gateway: Arc<TransportGateway>,
        recorder: StatusRecorder,
        transaction_url: impl Into<String>,
        payment_url: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            gateway,
            recorder,
            transaction_url: transaction_url.into(),
            payment_url: payment_url.into(),
        }
    }

    /// Revolut lists transactions across all accounts, so `account_ids` is
    /// ignored.
    pub async fn retrieve_transaction_data(&self, _account_ids: Option<&[String]>) -> Result<Vec<NormalizedTransaction>> {
        let token = self.tokens.get_token().await?;
        let transactions: Vec<RevolutTransaction> = self.gateway.retrieve(&token, &self.transaction_url).await?;

        info!("Constructing and validating {} Revolut transactions", transactions.len());
        Ok(transactions
            .into_iter()
            .map(mapper::to_normalized_transaction)
            .collect())
    }

    pub async fn create_payments(&self, payments: &[NormalizedPayment]) -> Result<Vec<PaymentResponse>> {
        let ctx = PushContext {
            provider: Provider::Revolut,
            tokens: &self.tokens,
            gateway: &self.gateway,
            recorder: &self.recorder,
            payment_url: &self.payment_url,
        };
        push_and_record::<_, RevolutPaymentResponse, _>(ctx, payments, mapper::to_revolut_payment).await
    }

    pub fn can_process(&self, provider: Provider) -> bool {
        provider == Provider::Revolut
    }
}
