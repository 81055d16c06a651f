use crate::error::Result;
use crate::models::{NormalizedAccount, NormalizedPayment, NormalizedTransaction, PaymentResponse, Provider};
use crate::services::deutsche::{DeutscheAccountService, DeutscheTransactionService};
use crate::services::revolut::{RevolutAccountService, RevolutTransactionService};

/// Account retrieval, one variant per provider.
#[derive(Clone)]
pub enum AccountService {
    Revolut(RevolutAccountService),
    Deutsche(DeutscheAccountService),
}

impl AccountService {
    pub fn provider(&self) -> Provider {
        match self {
            AccountService::Revolut(_) => Provider::Revolut,
            AccountService::Deutsche(_) => Provider::Deutsche,
        }
    }

    pub async fn retrieve_account_data(&self) -> Result<Vec<NormalizedAccount>> {
        match self {
            AccountService::Revolut(service) => service.retrieve_account_data().await,
            AccountService::Deutsche(service) => service.retrieve_account_data().await,
        }
    }

    pub fn can_process(&self, provider: Provider) -> bool {
        match self {
            AccountService::Revolut(service) => service.can_process(provider),
            AccountService::Deutsche(service) => service.can_process(provider),
        }
    }
}

/// Transaction retrieval and payment submission, one variant per provider.
#[derive(Clone)]
pub enum TransactionService {
    Revolut(RevolutTransactionService),
    Deutsche(DeutscheTransactionService),
}

impl TransactionService {
    pub fn provider(&self) -> Provider {
        match self {
            TransactionService::Revolut(_) => Provider::Revolut,
            TransactionService::Deutsche(_) => Provider::Deutsche,
        }
    }

    pub async fn retrieve_transaction_data(&self, account_ids: Option<&[String]>) -> Result<Vec<NormalizedTransaction>> {
        match self {
            TransactionService::Revolut(service) => service.retrieve_transaction_data(account_ids).await,
            TransactionService::Deutsche(service) => service.retrieve_transaction_data(account_ids).await,
        }
    }

    pub async fn create_payments(&self, payments: &[NormalizedPayment]) -> Result<Vec<PaymentResponse>> {
        match self {
            TransactionService::Revolut(service) => service.create_payments(payments).await,
            TransactionService::Deutsche(service) => service.create_payments(payments).await,
        }
    }

    pub fn can_process(&self, provider: Provider) -> bool {
        match self {
            TransactionService::Revolut(service) => service.can_process(provider),
            TransactionService::Deutsche(service) => service.can_process(provider),
        }
    }
}

/// Resolves provider identifiers to their services.
pub struct BankingServiceRegistry {
    revolut_accounts: AccountService,
    deutsche_accounts: AccountService,
    revolut_transactions: TransactionService,
    deutsche_transactions: TransactionService,
}

impl BankingServiceRegistry {
    pub fn new(
        revolut_accounts: RevolutAccountService,
        deutsche_accounts: DeutscheAccountService,
        revolut_transactions: RevolutTransactionService,
        deutsche_transactions: DeutscheTransactionService,
    ) -> Self {
        Self {
            revolut_accounts: AccountService::Revolut(revolut_accounts),
            deutsche_accounts: AccountService::Deutsche(deutsche_accounts),
            revolut_transactions: TransactionService::Revolut(revolut_transactions),
            deutsche_transactions: TransactionService::Deutsche(deutsche_transactions),
        }
    }

    pub fn account_service(&self, provider: Provider) -> &AccountService {
        let service = match provider {
            Provider::Revolut => &self.revolut_accounts,
            Provider::Deutsche => &self.deutsche_accounts,
        };
        debug_assert!(service.can_process(provider));
        service
    }

    pub fn transaction_service(&self, provider: Provider) -> &TransactionService {
        let service = match provider {
            Provider::Revolut => &self.revolut_transactions,
            Provider::Deutsche => &self.deutsche_transactions,
        };
        debug_assert!(service.can_process(provider));
        service
    }

    /// Fails with `UnsupportedProvider` before anything touches the network.
    pub fn resolve_accounts(&self, provider_id: &str) -> Result<&AccountService> {
        Ok(self.account_service(provider_id.parse()?))
    }

    pub fn resolve_transactions(&self, provider_id: &str) -> Result<&TransactionService> {
        Ok(self.transaction_service(provider_id.parse()?))
    }
}
