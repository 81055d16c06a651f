use crate::error::{BankingError, Result};
use crate::models::provider::Provider;
use crate::models::revolut::{RevolutAccount, RevolutPayment, RevolutReceiver, RevolutTransaction};
use crate::models::{NormalizedAccount, NormalizedPayment, NormalizedTransaction};
use tracing::debug;

pub const REFERENCE_KEY: &str = "reference";
pub const COUNTERPARTY_KEY: &str = "counterparty";

pub fn to_revolut_payment(payment: &NormalizedPayment) -> Result<RevolutPayment> {
    debug!("Attempting to construct RevolutPayment out of {}", payment);

    let amount = payment
        .amount
        .ok_or_else(|| BankingError::missing(payment.to_string(), "amount"))?;
    let source = payment
        .source_account
        .clone()
        .ok_or_else(|| BankingError::missing(payment.to_string(), "source account"))?;
    let destination = payment
        .destination_account
        .clone()
        .ok_or_else(|| BankingError::missing(payment.to_string(), "destination account"))?;
    let currency = payment
        .currency
        .clone()
        .ok_or_else(|| BankingError::missing(payment.to_string(), "currency"))?;
    let reference = payment
        .info(REFERENCE_KEY)
        .ok_or_else(|| BankingError::missing(payment.to_string(), "reference under 'additionalInfo'"))?;
    let counterparty = payment
        .info(COUNTERPARTY_KEY)
        .ok_or_else(|| BankingError::missing(payment.to_string(), "counterparty under 'additionalInfo'"))?;

    Ok(RevolutPayment {
        request_id: String::new(),
        account_id: source,
        receiver: RevolutReceiver {
            counterparty_id: counterparty.to_string(),
            account_id: destination,
        },
        amount,
        currency,
        reference: reference.to_string(),
    })
}

pub fn to_normalized_account(account: RevolutAccount) -> NormalizedAccount {
    NormalizedAccount {
        account_id: account.id,
        bank: Provider::Revolut,
        name: account.name,
        balance: account.balance,
        currency: account.currency,
        state: account.state,
    }
}

/// Flattens a transaction onto its first leg; merchant and card metadata are
/// carried over when present.
pub fn to_normalized_transaction(transaction: RevolutTransaction) -> NormalizedTransaction {
    let mut normalized = NormalizedTransaction::empty(Provider::Revolut);

    if let Some(leg) = transaction.legs.into_iter().next() {
        normalized.account_id = leg.account_id;
        normalized.amount = leg.amount;
        normalized.currency = leg.currency;
        if let Some(counterparty) = leg.counterparty {
            normalized.counterparty_account = counterparty.account_id;
            normalized.counterparty_name = counterparty.id;
        }
    }

    normalized.transaction_id = Some(transaction.id);
    normalized.state = transaction.state;
    normalized.reference = transaction.reference;
    normalized.created_at = transaction.created_at;
    normalized.completed_at = transaction.completed_at;
    normalized.merchant_name = transaction.merchant.and_then(|m| m.name);
    normalized.card_number = transaction.card.and_then(|c| c.card_number);
    normalized
}
