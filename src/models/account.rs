use crate::models::provider::Provider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAccount {
    pub account_id: String,
    pub bank: Provider,
    pub name: Option<String>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    pub state: Option<String>,
}
