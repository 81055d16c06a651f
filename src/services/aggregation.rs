use crate::error::{BankingError, Result};
use crate::models::{NormalizedAccount, NormalizedPayment, NormalizedTransaction, PaymentResponse, Provider};
use crate::services::registry::BankingServiceRegistry;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Parses the keys of a per-provider request map. An empty map or any unknown
/// key rejects the whole request, listing every requested key.
pub fn validate_providers<V>(params: &HashMap<String, V>) -> Result<Vec<Provider>> {
    let mut requested: Vec<&str> = params.keys().map(String::as_str).collect();
    requested.sort_unstable();

    match Provider::parse_all(requested.iter().copied()) {
        Ok(providers) if !providers.is_empty() => Ok(providers),
        _ => {
            error!("Detected requests for bank services that are not supported: {:?}", requested);
            Err(BankingError::unsupported(requested))
        }
    }
}

/// Fans requests out to every provider and merges the results by provider.
#[derive(Clone)]
pub struct AggregationService {
    registry: Arc<BankingServiceRegistry>,
}

impl AggregationService {
    pub fn new(registry: Arc<BankingServiceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn collect_accounts(&self) -> Result<HashMap<Provider, Vec<NormalizedAccount>>> {
        info!("Retrieving account entries");

        let results = try_join_all(Provider::ALL.iter().map(|&provider| async move {
            let accounts = self.registry.account_service(provider).retrieve_account_data().await?;
            Ok::<_, BankingError>((provider, accounts))
        }))
        .await?;

        Ok(results.into_iter().collect())
    }

    pub async fn collect_transactions(&self) -> Result<HashMap<Provider, Vec<NormalizedTransaction>>> {
        info!("Retrieving all transactions");

        let results = try_join_all(Provider::ALL.iter().map(|&provider| async move {
            let transactions = self
                .registry
                .transaction_service(provider)
                .retrieve_transaction_data(None)
                .await?;
            Ok::<_, BankingError>((provider, transactions))
        }))
        .await?;

        Ok(results.into_iter().collect())
    }

    /// Synchronous submission: each provider's list goes straight to its
    /// `create_payments`.
    pub async fn initiate_payment_requests(
        &self,
        params: HashMap<String, Vec<NormalizedPayment>>,
    ) -> Result<HashMap<Provider, Vec<PaymentResponse>>> {
        validate_providers(&params)?;

        let mut outcome = HashMap::new();
        for (key, mut payments) in params {
            let provider: Provider = key.parse()?;
            for payment in &mut payments {
                payment.bank = Some(provider);
            }

            info!("Creating {} payments for {}", payments.len(), provider);
            let responses = self
                .registry
                .transaction_service(provider)
                .create_payments(&payments)
                .await?;
            outcome.insert(provider, responses);
        }

        Ok(outcome)
    }
}
