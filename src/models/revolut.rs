//! Revolut Business API shapes.

use crate::models::payment::PaymentResponse;
use crate::services::gateway::{OutboundPayment, StepUpTarget};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevolutPayment {
    pub request_id: String,
    pub account_id: String,
    pub receiver: RevolutReceiver,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevolutReceiver {
    pub counterparty_id: String,
    pub account_id: String,
}

impl OutboundPayment for RevolutPayment {
    fn step_up_target(&self) -> Option<StepUpTarget<'_>> {
        None
    }

    fn assign_identification(&mut self, identification: String) {
        self.request_id = identification;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevolutPaymentResponse {
    pub id: String,
    pub state: String,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
}

impl From<RevolutPaymentResponse> for PaymentResponse {
    fn from(response: RevolutPaymentResponse) -> Self {
        PaymentResponse {
            payment_id: response.id,
            status: response.state,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevolutAccount {
    pub id: String,
    pub name: Option<String>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    pub state: Option<String>,
    pub public: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevolutTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub request_id: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub completed_at: Option<String>,
    pub related_transaction_id: Option<String>,
    pub reference: Option<String>,
    pub merchant: Option<RevolutMerchant>,
    #[serde(default)]
    pub legs: Vec<RevolutTransactionLeg>,
    pub card: Option<RevolutCard>,
}

/// One settlement leg; a transfer between own accounts has two.
#[derive(Debug, Clone, Deserialize)]
pub struct RevolutTransactionLeg {
    pub leg_id: Option<String>,
    pub account_id: Option<String>,
    pub counterparty: Option<RevolutCounterparty>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub balance: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevolutCounterparty {
    pub id: Option<String>,
    pub account_type: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevolutMerchant {
    pub name: Option<String>,
    pub city: Option<String>,
    pub category_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevolutCard {
    pub card_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}
