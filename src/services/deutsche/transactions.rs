use crate::error::{BankingError, Result};
use crate::models::deutsche::{DeutschePaymentResponse, DeutscheTransaction};
use crate::models::{NormalizedPayment, NormalizedTransaction, PaymentResponse, Provider};
use crate::services::deutsche::accounts::DeutscheAccountService;
use crate::services::deutsche::mapper;
use crate::services::gateway::TransportGateway;
use crate::services::payment_push::{push_and_record, PushContext};
use crate::services::status_recorder::StatusRecorder;
use crate::services::token_service::TokenService;
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Clone)]
pub struct DeutscheTransactionService {
    tokens: Arc<TokenService>,
    gateway: Arc<TransportGateway>,
    recorder: StatusRecorder,
    accounts: DeutscheAccountService,
    transaction_url: String,
    payment_url: String,
}

impl DeutscheTransactionService {
    pub fn new(
        tokens: Arc<TokenService>,
        gateway: Arc<TransportGateway>,
        recorder: StatusRecorder,
        accounts: DeutscheAccountService,
        transaction_url: impl Into<String>,
        payment_url: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            gateway,
            recorder,
            accounts,
            transaction_url: transaction_url.into(),
            payment_url: payment_url.into(),
        }
    }

    /// dbAPI lists transactions per IBAN. Without explicit IBANs the account
    /// list is fetched first; an explicit empty list yields nothing.
    pub async fn retrieve_transaction_data(&self, account_ids: Option<&[String]>) -> Result<Vec<NormalizedTransaction>> {
        let ibans: Vec<String> = match account_ids {
            Some(ids) => ids.to_vec(),
            None => self
                .accounts
                .retrieve_account_data()
                .await?
                .into_iter()
                .map(|account| account.account_id)
                .collect(),
        };

        if ibans.is_empty() {
            info!("No IBANs to retrieve Deutsche Bank transactions for");
            return Ok(Vec::new());
        }

        let token = self.tokens.get_token().await?;
        let mut normalized = Vec::new();

        for iban in &ibans {
            let url = Url::parse_with_params(&self.transaction_url, &[("iban", iban.as_str())])
                .map_err(|e| BankingError::Config(format!("invalid transaction url {}: {}", self.transaction_url, e)))?;
            let transactions: Vec<DeutscheTransaction> = self.gateway.retrieve(&token, url.as_str()).await?;
            normalized.extend(transactions.into_iter().map(mapper::to_normalized_transaction));
        }

        info!("Constructed {} Deutsche Bank transactions for {} IBANs", normalized.len(), ibans.len());
        Ok(normalized)
    }

    pub async fn create_payments(&self, payments: &[NormalizedPayment]) -> Result<Vec<PaymentResponse>> {
        let ctx = PushContext {
            provider: Provider::Deutsche,
            tokens: &self.tokens,
            gateway: &self.gateway,
            recorder: &self.recorder,
            payment_url: &self.payment_url,
        };
        push_and_record::<_, DeutschePaymentResponse, _>(ctx, payments, mapper::to_deutsche_payment).await
    }

    pub fn can_process(&self, provider: Provider) -> bool {
        provider == Provider::Deutsche
    }
}
