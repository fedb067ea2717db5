//! Integration tests for `ErpClient` using wiremock HTTP mocks.

use chrono::FixedOffset;
use stocksync_erp::{ErpClient, ErpConfig, ErpError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PATH: &str = "/OAPI/V2/OAPILogin";
const INVENTORY_ONE_PATH: &str = "/OAPI/V2/InventoryBalance/ViewInventoryBalanceStatus";
const INVENTORY_LIST_PATH: &str = "/OAPI/V2/InventoryBalance/GetListInventoryBalanceStatus";

fn test_config(session_ttl_secs: u64, max_retries: u32) -> ErpConfig {
    ErpConfig {
        com_code: "654321".to_owned(),
        user_id: "shopadmin".to_owned(),
        api_cert_key: "test-cert-key".to_owned(),
        lan_type: "ko-KR".to_owned(),
        zone: "CD".to_owned(),
        request_timeout_secs: 30,
        session_ttl_secs,
        max_retries,
        retry_delay_ms: 0,
        base_date_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
    }
}

fn test_client(base_url: &str, session_ttl_secs: u64, max_retries: u32) -> ErpClient {
    ErpClient::new(test_config(session_ttl_secs, max_retries), base_url)
        .expect("client construction should not fail")
}

fn login_body() -> serde_json::Value {
    serde_json::json!({"Data": {"Datas": {"SESSION_ID": "sid-test"}}})
}

fn result_body(entries: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"Data": {"Result": entries}})
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_partial_json(
            serde_json::json!({"COM_CODE": "654321", "USER_ID": "shopadmin"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_all_maps_and_filters_positive_records() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .and(query_param("SESSION_ID", "sid-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(serde_json::json!([
            {"PROD_CD": "S000000001", "BAL_QTY": 5.0},
            {"PROD_CD": "S00000000199", "BAL_QTY": 0.0},
            {"PROD_CD": "S000000002", "BAL_QTY": 3.0},
        ]))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let records = client.fetch_all().await.expect("fetch_all should succeed");

    let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["S000000001", "S000000002"],
        "zero-quantity records must be filtered, order preserved"
    );
    assert_eq!(records[0].quantity, 5);
    assert_eq!(records[1].quantity, 3);
}

#[tokio::test]
async fn session_is_reused_within_ttl() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .and(query_param("SESSION_ID", "sid-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            serde_json::json!([{"PROD_CD": "S000000001", "BAL_QTY": 5.0}]),
        )))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    client.fetch_all().await.expect("first fetch");
    client.fetch_all().await.expect("second fetch");
    // MockServer verifies on drop: exactly one login for two fetches.
}

#[tokio::test]
async fn expired_session_triggers_exactly_one_new_login() {
    let server = MockServer::start().await;
    mount_login(&server, 2).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            serde_json::json!([{"PROD_CD": "S000000001", "BAL_QTY": 5.0}]),
        )))
        .expect(2)
        .mount(&server)
        .await;

    // Zero TTL: every call sees a stale cache and logs in again.
    let client = test_client(&server.uri(), 0, 5);
    client.fetch_all().await.expect("first fetch");
    client.fetch_all().await.expect("second fetch");
}

#[tokio::test]
async fn fetch_one_returns_record_with_positive_stock() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_ONE_PATH))
        .and(query_param("SESSION_ID", "sid-test"))
        .and(body_partial_json(
            serde_json::json!({"PROD_CD": "S000000001"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            serde_json::json!([{"PROD_CD": "S000000001", "BAL_QTY": 7.0}]),
        )))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let record = client
        .fetch_one("S000000001")
        .await
        .expect("fetch_one should succeed")
        .expect("record should be present");

    assert_eq!(record.code, "S000000001");
    assert_eq!(record.quantity, 7);
}

#[tokio::test]
async fn fetch_one_returns_none_for_empty_result() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_ONE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result_body(serde_json::json!([]))),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let record = client
        .fetch_one("S000000001")
        .await
        .expect("fetch_one should succeed");
    assert!(record.is_none(), "empty result must map to None");
}

#[tokio::test]
async fn fetch_one_filters_non_positive_stock() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_ONE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            serde_json::json!([{"PROD_CD": "S000000001", "BAL_QTY": 0.0}]),
        )))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let record = client
        .fetch_one("S000000001")
        .await
        .expect("fetch_one should succeed");
    assert!(record.is_none(), "non-positive stock must map to None");
}

#[tokio::test]
async fn fetch_all_rejects_empty_result_as_no_stock() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result_body(serde_json::json!([]))),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let result = client.fetch_all().await;
    assert!(matches!(result, Err(ErpError::NoStock)));
}

#[tokio::test]
async fn fetch_all_rejects_missing_result_as_no_stock() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Data": {}})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let result = client.fetch_all().await;
    assert!(matches!(result, Err(ErpError::NoStock)));
}

#[tokio::test]
async fn quota_marker_short_circuits_without_retry() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Error": {"Message": "API 호출 허용량을 초과했습니다."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let result = client.fetch_all().await;
    assert!(
        matches!(result, Err(ErpError::QuotaExceeded(_))),
        "quota payload must surface as QuotaExceeded, got: {result:?}"
    );
    // expect(1) on the mock proves the retry budget was not spent.
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    // First four attempts fail at the HTTP layer, the fifth succeeds.
    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            serde_json::json!([{"PROD_CD": "S000000001", "BAL_QTY": 5.0}]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let records = client
        .fetch_all()
        .await
        .expect("should succeed on the fifth attempt");
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn exhausted_retry_budget_surfaces_http_error() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(6)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let result = client.fetch_all().await;
    assert!(
        matches!(result, Err(ErpError::Http(_))),
        "exhausted budget must surface the transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn login_failure_propagates_without_touching_inventory() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(INVENTORY_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(serde_json::json!([]))))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let result = client.fetch_all().await;
    assert!(matches!(result, Err(ErpError::Http(_))));
}

#[tokio::test]
async fn malformed_login_payload_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Data": {}})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 600, 5);
    let result = client.session_id().await;
    assert!(matches!(result, Err(ErpError::Decode { .. })));
}
