use crate::error::{BankingError, Result};
use crate::models::deutsche::{
    DeutscheAccount, DeutscheAccountReference, DeutscheAmount, DeutschePayment, DeutscheTransaction,
};
use crate::models::provider::Provider;
use crate::models::{NormalizedAccount, NormalizedPayment, NormalizedTransaction};
use crate::utils::money::format_decimal;
use tracing::debug;

pub const CREDITOR_NAME_KEY: &str = "creditorName";

pub fn to_deutsche_payment(payment: &NormalizedPayment) -> Result<DeutschePayment> {
    debug!("Attempting to construct DeutschePayment out of {}", payment);

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
    let creditor_name = payment
        .info(CREDITOR_NAME_KEY)
        .ok_or_else(|| BankingError::missing(payment.to_string(), "creditorName under 'additionalInfo'"))?;

    Ok(DeutschePayment {
        debtor_account: DeutscheAccountReference {
            iban: source,
            currency_code: currency.clone(),
        },
        instructed_amount: DeutscheAmount {
            amount: format_decimal(amount),
            currency_code: currency.clone(),
        },
        creditor_name: creditor_name.to_string(),
        creditor_account: DeutscheAccountReference {
            iban: destination,
            currency_code: currency,
        },
    })
}

pub fn to_normalized_account(account: DeutscheAccount) -> NormalizedAccount {
    NormalizedAccount {
        account_id: account.iban,
        bank: Provider::Deutsche,
        name: account.product_description,
        balance: account.current_balance,
        currency: account.currency_code,
        state: account.account_type,
    }
}

pub fn to_normalized_transaction(transaction: DeutscheTransaction) -> NormalizedTransaction {
    let mut normalized = NormalizedTransaction::empty(Provider::Deutsche);
    normalized.transaction_id = transaction.id;
    normalized.account_id = transaction.origin_iban;
    normalized.counterparty_account = transaction.counter_party_iban;
    normalized.counterparty_name = transaction.counter_party_name;
    normalized.amount = transaction.amount;
    normalized.currency = transaction.currency_code;
    normalized.state = transaction.transaction_code;
    normalized.reference = transaction.payment_reference;
    normalized.created_at = transaction.booking_date;
    normalized
}
