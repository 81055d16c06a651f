//! Deutsche Bank dbAPI shapes.

use crate::models::payment::PaymentResponse;
use crate::services::gateway::{OutboundPayment, StepUpTarget};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SEPA_CHALLENGE_REQUEST_TYPE: &str = "INSTANT_SEPA_CREDIT_TRANSFERS";
pub const SEPA_CHALLENGE_DATA_TYPE: &str = "challengeRequestDataInstantSepaCreditTransfers";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeutschePayment {
    pub debtor_account: DeutscheAccountReference,
    pub instructed_amount: DeutscheAmount,
    pub creditor_name: String,
    pub creditor_account: DeutscheAccountReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeutscheAccountReference {
    pub iban: String,
    pub currency_code: String,
}

/// The amount travels as a string with trailing zero decimals stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeutscheAmount {
    pub amount: String,
    pub currency_code: String,
}

impl OutboundPayment for DeutschePayment {
    fn step_up_target(&self) -> Option<StepUpTarget<'_>> {
        Some(StepUpTarget {
            iban: &self.creditor_account.iban,
            currency: &self.instructed_amount.currency_code,
            amount: &self.instructed_amount.amount,
        })
    }

    fn assign_identification(&mut self, _identification: String) {}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeutschePaymentResponse {
    pub payment_id: String,
    pub transaction_status: String,
}

impl From<DeutschePaymentResponse> for PaymentResponse {
    fn from(response: DeutschePaymentResponse) -> Self {
        PaymentResponse {
            payment_id: response.payment_id,
            status: response.transaction_status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeutscheAccount {
    pub iban: String,
    pub currency_code: Option<String>,
    pub bic: Option<String>,
    pub account_type: Option<String>,
    pub current_balance: Option<Decimal>,
    pub product_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeutscheTransaction {
    pub id: Option<String>,
    pub origin_iban: Option<String>,
    pub amount: Option<Decimal>,
    pub counter_party_name: Option<String>,
    pub counter_party_iban: Option<String>,
    pub payment_reference: Option<String>,
    pub booking_date: Option<String>,
    pub currency_code: Option<String>,
    pub transaction_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SepaChallengeRequest {
    pub method: String,
    pub request_type: String,
    pub request_data: SepaPaymentRequestData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SepaPaymentRequestData {
    #[serde(rename = "type")]
    pub kind: String,
    pub target_iban: String,
    pub amount_currency: String,
    pub amount_value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeCreated {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeAnswer {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeOtp {
    pub otp: String,
}
