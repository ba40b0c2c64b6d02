//! GitHub search client against a mock server.

use chrono::{NaiveDate, TimeZone, Utc};
use herald_gateway::{ChangeQuery, ChangeSource, GatewayError, MergeWindow};
use herald_http::{GitHubConfig, GitHubSearchClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> ChangeQuery {
    let day = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
    ChangeQuery::new("team-mirai/policy", MergeWindow::for_day(day))
}

fn client(server: &MockServer) -> GitHubSearchClient {
    GitHubSearchClient::new(GitHubConfig::new(&server.uri()).with_token("ghp_test")).unwrap()
}

fn item(number: u64, merged_at: Option<&str>) -> serde_json::Value {
    json!({
        "number": number,
        "title": format!("Policy update {number}"),
        "body": "Adds a section on childcare",
        "html_url": format!("https://github.com/team-mirai/policy/pull/{number}"),
        "user": {"login": "octocat"},
        "pull_request": {"merged_at": merged_at}
    })
}

#[tokio::test]
async fn search_sends_filtered_query_with_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param(
            "q",
            "is:pr is:merged repo:team-mirai/policy merged:2025-07-19T00:00:00Z..2025-07-20T00:00:00Z",
        ))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [item(12, Some("2025-07-19T03:00:00Z")), item(13, Some("2025-07-19T18:45:00Z"))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).merged_changes(&query()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].number, 12);
    assert_eq!(
        records[1].merged_at,
        Utc.with_ymd_and_hms(2025, 7, 19, 18, 45, 0).unwrap()
    );
}

#[tokio::test]
async fn search_skips_hits_without_merge_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "items": [item(1, None), item(2, Some("2025-07-19T10:00:00Z"))]
        })))
        .mount(&server)
        .await;

    let records = client(&server).merged_changes(&query()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].number, 2);
}

#[tokio::test]
async fn search_follows_pages_until_short_page() {
    let server = MockServer::start().await;
    let full_page: Vec<_> = (1..=100)
        .map(|n| item(n, Some("2025-07-19T10:00:00Z")))
        .collect();

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 101,
            "items": full_page
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 101,
            "items": [item(101, Some("2025-07-19T11:00:00Z"))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).merged_changes(&query()).await.unwrap();

    assert_eq!(records.len(), 101);
    assert_eq!(records[100].number, 101);
}

#[tokio::test]
async fn search_drops_merge_at_window_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "items": [
                item(11, Some("2025-07-19T00:00:00Z")),
                item(12, Some("2025-07-19T03:00:00Z")),
                item(14, Some("2025-07-20T00:00:00Z"))
            ]
        })))
        .mount(&server)
        .await;

    let records = client(&server).merged_changes(&query()).await.unwrap();

    let numbers: Vec<u64> = records.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![11, 12]);
}

#[tokio::test]
async fn empty_result_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "items": []
        })))
        .mount(&server)
        .await;

    let records = client(&server).merged_changes(&query()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn rate_limit_maps_to_quota() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("API rate limit exceeded for user"),
        )
        .mount(&server)
        .await;

    let err = client(&server).merged_changes(&query()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Quota(_)));
}

#[tokio::test]
async fn server_error_maps_to_response_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).merged_changes(&query()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Response(_)));
}

#[tokio::test]
async fn malformed_json_maps_to_response_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server).merged_changes(&query()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Response(_)));
}
