use crate::app::config::Config;
use crate::error::Result;
use crate::models::Provider;
use crate::repository::StatusRepositoryRef;
use crate::services::deutsche::{DeutscheAccountService, DeutscheTransactionService, MultiFactorService};
use crate::services::gateway::{build_client, TransportGateway};
use crate::services::revolut::{RevolutAccountService, RevolutTransactionService};
use crate::services::{BankingServiceRegistry, StatusRecorder, TokenService};
use std::sync::Arc;

/// Wires token services, gateways and provider services from configuration.
/// All providers share one HTTP client.
pub fn build_registry(
    config: &Config,
    statuses: StatusRepositoryRef,
) -> Result<Arc<BankingServiceRegistry>> {
    let client = build_client(&config.gateway)?;

    let revolut_tokens = Arc::new(TokenService::revolut(client.clone(), &config.revolut));
    let revolut_gateway = Arc::new(TransportGateway::new(client.clone(), &config.gateway));

    let deutsche_tokens = Arc::new(TokenService::deutsche(client.clone(), &config.deutsche));
    let deutsche_gateway = Arc::new(
        TransportGateway::new(client.clone(), &config.gateway)
            .with_multi_factor(MultiFactorService::new(client, &config.deutsche)),
    );

    let revolut_accounts = RevolutAccountService::new(
        revolut_tokens.clone(),
        revolut_gateway.clone(),
        config.revolut.account_url.clone(),
    );
    let revolut_transactions = RevolutTransactionService::new(
        revolut_tokens,
        revolut_gateway,
        StatusRecorder::new(Provider::Revolut, statuses.clone()),
        config.revolut.transaction_url.clone(),
        config.revolut.payment_url.clone(),
    );

    let deutsche_accounts = DeutscheAccountService::new(
        deutsche_tokens.clone(),
        deutsche_gateway.clone(),
        config.deutsche.account_url.clone(),
    );
    let deutsche_transactions = DeutscheTransactionService::new(
        deutsche_tokens,
        deutsche_gateway,
        StatusRecorder::new(Provider::Deutsche, statuses),
        deutsche_accounts.clone(),
        config.deutsche.transaction_url.clone(),
        config.deutsche.payment_url.clone(),
    );

    Ok(Arc::new(BankingServiceRegistry::new(
        revolut_accounts,
        deutsche_accounts,
        revolut_transactions,
        deutsche_transactions,
    )))
}
