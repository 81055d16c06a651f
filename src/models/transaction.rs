use crate::models::provider::Provider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only projection of a provider transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub transaction_id: Option<String>,
    pub bank: Provider,
    pub account_id: Option<String>,
    pub counterparty_account: Option<String>,
    pub counterparty_name: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub state: Option<String>,
    pub reference: Option<String>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    pub merchant_name: Option<String>,
    pub card_number: Option<String>,
}

impl NormalizedTransaction {
    pub fn empty(bank: Provider) -> Self {
        Self {
            transaction_id: None,
            bank,
            account_id: None,
            counterparty_account: None,
            counterparty_name: None,
            amount: None,
            currency: None,
            state: None,
            reference: None,
            created_at: None,
            completed_at: None,
            merchant_name: None,
            card_number: None,
        }
    }
}
