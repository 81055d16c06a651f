use crate::error::Result;
use crate::models::deutsche::DeutscheAccount;
use crate::models::{NormalizedAccount, Provider};
use crate::services::deutsche::mapper;
use crate::services::gateway::TransportGateway;
use crate::services::token_service::TokenService;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct DeutscheAccountService {
    tokens: Arc<TokenService>,
    gateway: Arc<TransportGateway>,
    account_url: String,
}

impl DeutscheAccountService {
    pub fn new(tokens: Arc<TokenService>, gateway: Arc<TransportGateway>, account_url: impl Into<String>) -> Self {
        Self {
            tokens,
            gateway,
            account_url: account_url.into(),
        }
    }

    pub async fn retrieve_account_data(&self) -> Result<Vec<NormalizedAccount>> {
        let token = self.tokens.get_token().await?;
        let accounts: Vec<DeutscheAccount> = self.gateway.retrieve(&token, &self.account_url).await?;

        info!("Retrieved {} Deutsche Bank accounts", accounts.len());
        Ok(accounts.into_iter().map(mapper::to_normalized_account).collect())
    }

    pub fn can_process(&self, provider: Provider) -> bool {
        provider == Provider::Deutsche
    }
}
