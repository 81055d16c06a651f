mod common;

use bank_orchestrator::models::Provider;
use bank_orchestrator::repository::StatusRepository;
use bank_orchestrator::services::{AggregationService, FAILED_PAYMENT_ID_PREFIX, FAILED_PAYMENT_STATUS};
use bank_orchestrator::BankingError;
use common::{deutsche_payment, revolut_payment, Harness, CREDITOR_IBAN, DEUTSCHE_IBAN, REVOLUT_IBAN};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mount_revolut_accounts(harness: &Harness, body: Value) {
    Mock::given(method("GET"))
        .and(path("/revolut/accounts"))
        .and(header("authorization", "Bearer revolut-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&harness.server)
        .await;
}

fn deutsche_account_json() -> Value {
    json!([{
        "iban": DEUTSCHE_IBAN,
        "currencyCode": "EUR",
        "bic": "COBADEFFXXX",
        "accountType": "CURRENT_ACCOUNT",
        "currentBalance": 1500.25,
        "productDescription": "Girokonto"
    }])
}

fn deutsche_transaction_json() -> Value {
    json!([{
        "id": "db-tx-1",
        "originIban": DEUTSCHE_IBAN,
        "amount": -12.5,
        "counterPartyName": "Bakery",
        "counterPartyIban": CREDITOR_IBAN,
        "paymentReference": "bread",
        "bookingDate": "2024-01-02",
        "currencyCode": "EUR",
        "transactionCode": "123"
    }])
}

#[tokio::test]
async fn token_endpoint_failure_is_reported_as_token_fetch() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/revolut/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&harness.server)
        .await;

    let service = harness.registry.resolve_accounts("REVOLUT").unwrap();
    match service.retrieve_account_data().await {
        Err(BankingError::TokenFetch { provider, reason }) => {
            assert_eq!(provider, Provider::Revolut);
            assert!(reason.contains("invalid_grant"));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(harness.requests_to("/revolut/accounts").await.is_empty());
}

#[tokio::test]
async fn token_request_carries_refresh_grant() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    mount_revolut_accounts(&harness, json!([])).await;

    harness
        .registry
        .account_service(Provider::Revolut)
        .retrieve_account_data()
        .await
        .unwrap();

    let requests = harness.requests_to("/revolut/token").await;
    assert_eq!(requests.len(), 1);
    let form = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(form.contains("grant_type=refresh_token"));
    assert!(form.contains("refresh_token=revolut-refresh"));
    assert!(form.contains("client_id=revolut-client"));
    assert!(form.contains("client_assertion=signed-jwt"));
}

#[tokio::test]
async fn long_lived_token_is_reused() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/revolut/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "revolut-token",
            "token_type": "Bearer",
            "expires_in": 2399
        })))
        .expect(1)
        .mount(&harness.server)
        .await;
    mount_revolut_accounts(&harness, json!([])).await;

    let service = harness.registry.account_service(Provider::Revolut);
    service.retrieve_account_data().await.unwrap();
    service.retrieve_account_data().await.unwrap();

    assert_eq!(harness.requests_to("/revolut/accounts").await.len(), 2);
}

#[tokio::test]
async fn short_lived_token_is_fetched_every_time() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/revolut/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "revolut-token",
            "expires_in": 10
        })))
        .expect(2)
        .mount(&harness.server)
        .await;
    mount_revolut_accounts(&harness, json!([])).await;

    let service = harness.registry.account_service(Provider::Revolut);
    service.retrieve_account_data().await.unwrap();
    service.retrieve_account_data().await.unwrap();
}

#[tokio::test]
async fn bare_account_object_is_read_as_one_element_list() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    mount_revolut_accounts(
        &harness,
        json!({
            "id": "acc-1",
            "name": "Main",
            "balance": 12.5,
            "currency": "EUR",
            "state": "active",
            "public": false
        }),
    )
    .await;

    let accounts = harness
        .registry
        .account_service(Provider::Revolut)
        .retrieve_account_data()
        .await
        .unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].account_id, "acc-1");
    assert_eq!(accounts[0].bank, Provider::Revolut);
    assert_eq!(accounts[0].balance, Some(dec!(12.5)));
}

#[tokio::test]
async fn revolut_transactions_are_flattened_onto_first_leg() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    Mock::given(method("GET"))
        .and(path("/revolut/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "tx-1",
            "type": "card_payment",
            "state": "completed",
            "created_at": "2024-03-01T10:00:00Z",
            "completed_at": "2024-03-01T10:00:05Z",
            "merchant": { "name": "Coffee Shop", "city": "London" },
            "card": { "card_number": "4111********1111" },
            "legs": [
                { "leg_id": "l-1", "account_id": "acc-1", "amount": -3.2, "currency": "GBP" },
                { "leg_id": "l-2", "account_id": "acc-2", "amount": 3.2, "currency": "GBP" }
            ]
        }])))
        .mount(&harness.server)
        .await;

    let transactions = harness
        .registry
        .transaction_service(Provider::Revolut)
        .retrieve_transaction_data(Some(&["ignored".to_string()]))
        .await
        .unwrap();

    assert_eq!(transactions.len(), 1);
    let tx = &transactions[0];
    assert_eq!(tx.transaction_id.as_deref(), Some("tx-1"));
    assert_eq!(tx.account_id.as_deref(), Some("acc-1"));
    assert_eq!(tx.amount, Some(dec!(-3.2)));
    assert_eq!(tx.merchant_name.as_deref(), Some("Coffee Shop"));
    assert_eq!(tx.card_number.as_deref(), Some("4111********1111"));
}

#[tokio::test]
async fn revolut_push_records_first_response() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    Mock::given(method("POST"))
        .and(path("/revolut/pay"))
        .and(header("authorization", "Bearer revolut-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pay-1",
            "state": "pending",
            "created_at": "2024-03-01T10:00:00Z"
        })))
        .expect(2)
        .mount(&harness.server)
        .await;

    let responses = harness
        .registry
        .transaction_service(Provider::Revolut)
        .create_payments(&[revolut_payment("10.5"), revolut_payment("20")])
        .await
        .unwrap();
    assert!(responses.is_empty());

    let requests = harness.requests_to("/revolut/pay").await;
    let bodies: Vec<Value> = requests.iter().map(|r| r.body_json().unwrap()).collect();
    assert_eq!(bodies[0]["amount"], json!(10.5));
    assert_eq!(bodies[1]["amount"], json!(20.0));
    assert_eq!(bodies[0]["account_id"], json!(REVOLUT_IBAN));
    assert_eq!(bodies[0]["receiver"]["counterparty_id"], json!("cp-1"));
    assert_eq!(bodies[0]["reference"], json!("invoice 17"));

    let request_ids: HashSet<&str> = bodies
        .iter()
        .map(|body| body["request_id"].as_str().unwrap())
        .collect();
    assert_eq!(request_ids.len(), 2);
    assert!(request_ids
        .iter()
        .all(|id| id.len() == harness.config.gateway.max_request_id_length));

    let records = harness.statuses.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].payment_id, "pay-1");
    assert_eq!(records[0].status, "pending");
    assert_eq!(records[0].bank, Provider::Revolut);
}

#[tokio::test]
async fn deutsche_push_answers_a_fresh_challenge_per_payment() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Deutsche, 600).await;
    harness.mount_challenge("otp-42").await;
    Mock::given(method("POST"))
        .and(path("/deutsche/payments"))
        .and(header("otp", "otp-42"))
        .and(header_exists("idempotency-id"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "paymentId": "db-pay-1",
            "transactionStatus": "ACCP"
        })))
        .expect(2)
        .mount(&harness.server)
        .await;

    let responses = harness
        .registry
        .transaction_service(Provider::Deutsche)
        .create_payments(&[deutsche_payment("10.0"), deutsche_payment("10.01")])
        .await
        .unwrap();
    assert!(responses.is_empty());

    let challenges = harness.requests_to("/deutsche/challenges").await;
    assert_eq!(challenges.len(), 2);
    let first: Value = challenges[0].body_json().unwrap();
    assert_eq!(first["method"], json!("MTAN"));
    assert_eq!(first["requestType"], json!("INSTANT_SEPA_CREDIT_TRANSFERS"));
    assert_eq!(first["requestData"]["targetIban"], json!(CREDITOR_IBAN));
    assert_eq!(first["requestData"]["amountValue"], json!("10"));
    let second: Value = challenges[1].body_json().unwrap();
    assert_eq!(second["requestData"]["amountValue"], json!("10.01"));

    let answers = harness.requests_to("/deutsche/challenges/challenge-1").await;
    assert_eq!(answers.len(), 2);
    let answer: Value = answers[0].body_json().unwrap();
    assert_eq!(answer["response"], json!(harness.config.deutsche.challenge_response));

    let payments = harness.requests_to("/deutsche/payments").await;
    let idempotency: HashSet<String> = payments
        .iter()
        .map(|r| r.headers.get("idempotency-id").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(idempotency.len(), 2);

    let body: Value = payments[0].body_json().unwrap();
    assert_eq!(body["instructedAmount"]["amount"], json!("10"));
    assert_eq!(body["creditorName"], json!("Jane Doe"));
    assert_eq!(body["debtorAccount"]["iban"], json!(DEUTSCHE_IBAN));

    let records = harness.statuses.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].payment_id, "db-pay-1");
    assert_eq!(records[0].status, "ACCP");
    assert_eq!(records[0].bank, Provider::Deutsche);
}

#[tokio::test]
async fn server_error_during_push_is_recorded_as_failure() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    Mock::given(method("POST"))
        .and(path("/revolut/pay"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&harness.server)
        .await;

    let responses = harness
        .registry
        .transaction_service(Provider::Revolut)
        .create_payments(&[revolut_payment("5"), revolut_payment("6")])
        .await
        .unwrap();
    assert!(responses.is_empty());

    // The first failure stops the push.
    assert_eq!(harness.requests_to("/revolut/pay").await.len(), 1);

    let records = harness.statuses.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].payment_id.starts_with(FAILED_PAYMENT_ID_PREFIX));
    assert_eq!(records[0].status, FAILED_PAYMENT_STATUS);
    assert_eq!(records[0].bank, Provider::Revolut);
    assert_eq!(records[0].amount, Some(dec!(5)));
}

#[tokio::test]
async fn client_error_during_challenge_is_recorded_as_failure() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Deutsche, 600).await;
    Mock::given(method("POST"))
        .and(path("/deutsche/challenges"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad challenge"))
        .mount(&harness.server)
        .await;

    let responses = harness
        .registry
        .transaction_service(Provider::Deutsche)
        .create_payments(&[deutsche_payment("1")])
        .await
        .unwrap();
    assert!(responses.is_empty());
    assert!(harness.requests_to("/deutsche/payments").await.is_empty());

    let records = harness.statuses.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, FAILED_PAYMENT_STATUS);
    assert_eq!(records[0].bank, Provider::Deutsche);
}

#[tokio::test]
async fn empty_payment_list_touches_nothing() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/revolut/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
        .expect(0)
        .mount(&harness.server)
        .await;

    let responses = harness
        .registry
        .transaction_service(Provider::Revolut)
        .create_payments(&[])
        .await
        .unwrap();

    assert!(responses.is_empty());
    assert!(harness.statuses.find_all().await.unwrap().is_empty());
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_reference_fails_before_any_request() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;

    let valid = revolut_payment("1");
    let mut invalid = revolut_payment("2");
    invalid.additional_info.as_mut().unwrap().remove("reference");

    let result = harness
        .registry
        .transaction_service(Provider::Revolut)
        .create_payments(&[valid, invalid])
        .await;

    match result {
        Err(BankingError::MissingPaymentData { field, .. }) => assert!(field.contains("reference")),
        other => panic!("unexpected {:?}", other),
    }
    assert!(harness.server.received_requests().await.unwrap().is_empty());
    assert!(harness.statuses.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn unsupported_provider_is_rejected_without_calls() {
    let harness = Harness::start().await;

    assert_eq!(
        harness.registry.resolve_accounts("DEUTSCHE").unwrap().provider(),
        Provider::Deutsche
    );
    assert_eq!(
        harness.registry.resolve_transactions("REVOLUT").unwrap().provider(),
        Provider::Revolut
    );

    assert!(matches!(
        harness.registry.resolve_accounts("ING"),
        Err(BankingError::UnsupportedProvider { .. })
    ));
    assert!(matches!(
        harness.registry.resolve_transactions("revolut"),
        Err(BankingError::UnsupportedProvider { .. })
    ));

    let aggregation = AggregationService::new(harness.registry.clone());
    let mut params = HashMap::new();
    params.insert("REVOLUT".to_string(), vec![revolut_payment("1")]);
    params.insert("ING".to_string(), vec![revolut_payment("1")]);

    match aggregation.initiate_payment_requests(params).await {
        Err(BankingError::UnsupportedProvider { requested, .. }) => {
            assert_eq!(requested, vec!["ING".to_string(), "REVOLUT".to_string()]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn initiate_payment_requests_dispatches_each_provider() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    harness.mount_token(Provider::Deutsche, 3600).await;
    harness.mount_challenge("otp-1").await;
    Mock::given(method("POST"))
        .and(path("/revolut/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "rv-1", "state": "pending" })))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/deutsche/payments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "paymentId": "db-1",
            "transactionStatus": "ACCP"
        })))
        .mount(&harness.server)
        .await;

    let mut params = HashMap::new();
    params.insert("REVOLUT".to_string(), vec![revolut_payment("1")]);
    // Caller-supplied bank fields are overwritten by the map key.
    let mut mislabelled = deutsche_payment("2");
    mislabelled.bank = Some(Provider::Revolut);
    params.insert("DEUTSCHE".to_string(), vec![mislabelled]);

    let aggregation = AggregationService::new(harness.registry.clone());
    let outcome = aggregation.initiate_payment_requests(params).await.unwrap();

    assert_eq!(outcome.len(), 2);
    assert!(outcome.values().all(Vec::is_empty));

    let records = harness.statuses.find_all().await.unwrap();
    let ids: HashSet<&str> = records.iter().map(|r| r.payment_id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["rv-1", "db-1"]));
}

#[tokio::test]
async fn aggregation_collects_accounts_from_every_provider() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    harness.mount_token(Provider::Deutsche, 3600).await;
    mount_revolut_accounts(&harness, json!([{ "id": "acc-1", "currency": "GBP" }])).await;
    Mock::given(method("GET"))
        .and(path("/deutsche/accounts"))
        .and(header("authorization", "Bearer deutsche-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(deutsche_account_json()))
        .mount(&harness.server)
        .await;

    let aggregation = AggregationService::new(harness.registry.clone());
    let accounts = aggregation.collect_accounts().await.unwrap();

    assert_eq!(accounts[&Provider::Revolut][0].account_id, "acc-1");
    let deutsche = &accounts[&Provider::Deutsche][0];
    assert_eq!(deutsche.account_id, DEUTSCHE_IBAN);
    assert_eq!(deutsche.name.as_deref(), Some("Girokonto"));
    assert_eq!(deutsche.balance, Some(dec!(1500.25)));
}

#[tokio::test]
async fn aggregation_fails_when_one_provider_fails() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    harness.mount_token(Provider::Deutsche, 3600).await;
    mount_revolut_accounts(&harness, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/deutsche/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&harness.server)
        .await;

    let aggregation = AggregationService::new(harness.registry.clone());
    match aggregation.collect_accounts().await {
        Err(BankingError::HttpServer { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn deutsche_transactions_are_listed_per_iban() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Deutsche, 3600).await;
    Mock::given(method("GET"))
        .and(path("/deutsche/transactions"))
        .and(query_param("iban", DEUTSCHE_IBAN))
        .respond_with(ResponseTemplate::new(200).set_body_json(deutsche_transaction_json()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let transactions = harness
        .registry
        .transaction_service(Provider::Deutsche)
        .retrieve_transaction_data(Some(&[DEUTSCHE_IBAN.to_string()]))
        .await
        .unwrap();

    assert_eq!(transactions.len(), 1);
    let tx = &transactions[0];
    assert_eq!(tx.bank, Provider::Deutsche);
    assert_eq!(tx.account_id.as_deref(), Some(DEUTSCHE_IBAN));
    assert_eq!(tx.counterparty_name.as_deref(), Some("Bakery"));
    assert_eq!(tx.amount, Some(dec!(-12.5)));
    assert!(harness.requests_to("/deutsche/accounts").await.is_empty());
}

#[tokio::test]
async fn deutsche_transactions_without_ibans_use_account_list() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Deutsche, 3600).await;
    Mock::given(method("GET"))
        .and(path("/deutsche/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(deutsche_account_json()))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/deutsche/transactions"))
        .and(query_param("iban", DEUTSCHE_IBAN))
        .respond_with(ResponseTemplate::new(200).set_body_json(deutsche_transaction_json()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let transactions = harness
        .registry
        .transaction_service(Provider::Deutsche)
        .retrieve_transaction_data(None)
        .await
        .unwrap();

    assert_eq!(transactions.len(), 1);
}

#[tokio::test]
async fn deutsche_transactions_for_no_ibans_is_empty() {
    let harness = Harness::start().await;

    let transactions = harness
        .registry
        .transaction_service(Provider::Deutsche)
        .retrieve_transaction_data(Some(&[]))
        .await
        .unwrap();

    assert!(transactions.is_empty());
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unrepresentable_token_expiry_is_not_cached() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/revolut/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "revolut-token",
            "expires_in": u64::MAX
        })))
        .expect(2)
        .mount(&harness.server)
        .await;
    mount_revolut_accounts(&harness, json!([])).await;

    let service = harness.registry.account_service(Provider::Revolut);
    assert!(service.retrieve_account_data().await.unwrap().is_empty());
    assert!(service.retrieve_account_data().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_listing_is_a_decode_error() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    Mock::given(method("GET"))
        .and(path("/revolut/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&harness.server)
        .await;

    let result = harness
        .registry
        .account_service(Provider::Revolut)
        .retrieve_account_data()
        .await;

    assert!(matches!(result, Err(BankingError::Decode(_))));
}

#[tokio::test]
async fn undecodable_push_response_is_recorded_as_failure() {
    let harness = Harness::start().await;
    harness.mount_token(Provider::Revolut, 3600).await;
    Mock::given(method("POST"))
        .and(path("/revolut/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&harness.server)
        .await;

    let responses = harness
        .registry
        .transaction_service(Provider::Revolut)
        .create_payments(&[revolut_payment("7"), revolut_payment("8")])
        .await
        .unwrap();
    assert!(responses.is_empty());

    let records = harness.statuses.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].payment_id.starts_with(FAILED_PAYMENT_ID_PREFIX));
    assert_eq!(records[0].status, FAILED_PAYMENT_STATUS);
    assert_eq!(records[0].amount, Some(dec!(7)));
}
