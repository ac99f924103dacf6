//! Mock API tests for the Lookback client.
//!
//! These tests drive the full pipeline against a wiremock server speaking
//! the Lookback API response envelope.

use rally_lookback::{LookbackApi, LookbackError, LookbackQuery};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SNAPSHOT_PATH: &str =
    "/analytics/v2.0/service/rally/workspace/12345/artifact/snapshot/query.js";

/// Lookback response envelope as served by Rally.
fn snapshot_envelope(start: u64, total: u64, results: Value) -> Value {
    json!({
        "_rallyAPIMajor": "2",
        "_rallyAPIMinor": "0",
        "Errors": [],
        "Warnings": [],
        "TotalResultCount": total,
        "StartIndex": start,
        "PageSize": 200,
        "ETLDate": "2026-01-15T03:00:00.000Z",
        "Results": results,
    })
}

fn api_for(server: &MockServer) -> LookbackApi {
    LookbackApi::builder()
        .server(server.uri())
        .credentials("user", "pass")
        .workspace("12345")
        .build()
        .unwrap()
}

#[tokio::test]
async fn executes_a_snapshot_query_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .and(body_partial_json(
            json!({"find": {"_TypeHierarchy": "Defect"}, "start": 0}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_envelope(
            0,
            2,
            json!([
                {"ObjectID": 1, "State": "Open"},
                {"ObjectID": 2, "State": "Closed"},
            ]),
        )))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let query = api
        .new_snapshot_query()
        .find_clause("_TypeHierarchy", "Defect")
        .fields(["ObjectID", "State"]);

    let result = api.execute_query(&query).await.unwrap();
    assert_eq!(result.total_result_count, 2);
    assert_eq!(result.results.len(), 2);
    assert_eq!(result.results[0]["ObjectID"], json!(1));
    assert_eq!(result.etl_date.as_deref(), Some("2026-01-15T03:00:00.000Z"));
    assert!(!result.has_more_pages());
}

#[tokio::test]
async fn explicit_nulls_are_preserved_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_envelope(
            0,
            1,
            json!([{"ObjectID": 1, "PlanEstimate": null, "Blocked": false}]),
        )))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let result = api.execute_query(&LookbackQuery::new()).await.unwrap();

    let snapshot = &result.results[0];
    assert_eq!(snapshot["PlanEstimate"], Value::Null);
    assert_eq!(snapshot["Blocked"], json!(false));
}

#[tokio::test]
async fn unauthorized_response_fails_with_authorization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("<html>401 Unauthorized</html>"),
        )
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let err = api
        .execute_query(&LookbackQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LookbackError::Authorization));
}

#[tokio::test]
async fn empty_body_fails_with_no_data_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let err = api
        .execute_query(&LookbackQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LookbackError::NoData));
}

#[tokio::test]
async fn malformed_body_fails_with_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let err = api
        .execute_query(&LookbackQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LookbackError::Parse(_)));
}

#[tokio::test]
async fn server_reported_errors_fail_result_validation() {
    let mock_server = MockServer::start().await;

    // Rally answers malformed queries with a JSON envelope carrying Errors,
    // not an HTTP error status.
    let mut envelope = snapshot_envelope(0, 0, json!([]));
    envelope["Errors"] = json!(["Could not parse find"]);

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let err = api
        .execute_query(&LookbackQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LookbackError::ResultValidation(_)));
}

#[tokio::test]
async fn requests_carry_no_auth_header_without_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(snapshot_envelope(0, 0, json!([]))),
        )
        .mount(&mock_server)
        .await;

    let api = LookbackApi::builder()
        .server(mock_server.uri())
        .workspace("12345")
        .build()
        .unwrap();
    api.execute_query(&LookbackQuery::new()).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn paginates_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .and(body_partial_json(json!({"start": 0, "pagesize": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_envelope(
            0,
            5,
            json!([{"ObjectID": 1}, {"ObjectID": 2}]),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SNAPSHOT_PATH))
        .and(body_partial_json(json!({"start": 2, "pagesize": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_envelope(
            2,
            5,
            json!([{"ObjectID": 3}, {"ObjectID": 4}]),
        )))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let query = api.new_snapshot_query().page_size(2);

    let first = api.execute_query(&query).await.unwrap();
    assert!(first.has_more_pages());

    let second = api
        .execute_query(&api.query_for_next_page(&first).unwrap())
        .await
        .unwrap();
    assert_eq!(second.start_index, 2);
    assert_eq!(second.results[0]["ObjectID"], json!(3));
}
