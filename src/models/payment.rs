use crate::models::provider::Provider;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Provider-agnostic outbound payment as submitted by callers.
///
/// Everything but the provider is optional on the wire so that the mappers can
/// name the missing field instead of failing inside the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPayment {
    pub source_account: Option<String>,
    pub destination_account: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub batch_id: Option<u64>,
    /// Overwritten from the request key on submission. An unknown identifier
    /// is rejected by the decoder with the supported set.
    #[serde(default)]
    pub bank: Option<Provider>,
    pub additional_info: Option<HashMap<String, String>>,
}

impl NormalizedPayment {
    pub fn info(&self, key: &str) -> Option<&str> {
        self.additional_info
            .as_ref()
            .and_then(|info| info.get(key))
            .map(String::as_str)
    }
}

impl fmt::Display for NormalizedPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} payment from {} to {} ({} {})",
            self.bank.map(|bank| bank.as_str()).unwrap_or("?"),
            self.source_account.as_deref().unwrap_or("?"),
            self.destination_account.as_deref().unwrap_or("?"),
            self.amount.map(|a| a.to_string()).unwrap_or_else(|| "?".to_string()),
            self.currency.as_deref().unwrap_or("?"),
        )
    }
}

/// Minimal view every provider payment response exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: String,
    pub status: String,
}

/// Durable outcome of one payment submission attempt. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRecord {
    pub payment_id: String,
    pub status: String,
    pub batch_id: Option<u64>,
    pub bank: Provider,
    pub source_account: Option<String>,
    pub destination_account: Option<String>,
    pub amount: Option<Decimal>,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentStatusRecord {
    pub fn for_payment(payment: &NormalizedPayment, bank: Provider, payment_id: String, status: String) -> Self {
        Self {
            payment_id,
            status,
            batch_id: payment.batch_id,
            bank,
            source_account: payment.source_account.clone(),
            destination_account: payment.destination_account.clone(),
            amount: payment.amount,
            recorded_at: Utc::now(),
        }
    }
}
