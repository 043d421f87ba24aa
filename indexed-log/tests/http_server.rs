#![cfg(feature = "http-server")]
//! Integration tests for the query HTTP server.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use common::{MockClock, SystemClock};
use indexed_log::server::QueryServer;
use indexed_log::{FieldValue, LogAppender, LogFileOptions, Record};

fn test_opts(dir: &TempDir) -> LogFileOptions {
    LogFileOptions {
        root: dir.path().to_path_buf(),
        bytes_per_node: 512,
        tree_depth: 2,
    }
}

fn populate(opts: &LogFileOptions, start_secs: i64, count: i64) {
    let mut appender = LogAppender::create(opts.clone()).unwrap();
    for i in 0..count {
        let record = Record {
            timestamp: Utc.timestamp_opt(start_secs + i, 0).unwrap(),
            tag: "http.test".to_string(),
            key: FieldValue::from("seq"),
            value: FieldValue::Int(i),
        };
        appender.append(&record).unwrap();
    }
    appender.checkpoint().unwrap();
}

async fn get_json(
    router: axum::Router,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn should_answer_healthy_probe() {
    // given
    let dir = TempDir::new().unwrap();
    let router = QueryServer::router(test_opts(&dir), Arc::new(SystemClock));

    // when
    let (status, json) = get_json(router, "/-/healthy").await;

    // then
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn should_report_ready_when_root_exists() {
    // given
    let dir = TempDir::new().unwrap();
    let router = QueryServer::router(test_opts(&dir), Arc::new(SystemClock));

    // when
    let (status, json) = get_json(router, "/-/ready").await;

    // then
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn should_report_unready_when_root_missing() {
    // given
    let opts = LogFileOptions::new("/does/not/exist");
    let router = QueryServer::router(opts, Arc::new(SystemClock));

    // when
    let (status, json) = get_json(router, "/-/ready").await;

    // then
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn should_answer_absolute_range_query() {
    // given - records at t = 10000..10500 (1970-01-01T02:46:40Z onward)
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    populate(&opts, 10_000, 500);
    let router = QueryServer::router(opts, Arc::new(SystemClock));

    // when - query (02:48:20, 02:50:00) = seconds (10100, 10200)
    let (status, json) = get_json(
        router,
        "/api/v1/query?time_opt=absolute&start=1970-01-01T02:48:20Z&end=1970-01-01T02:50:00Z",
    )
    .await;

    // then - 99 strictly-interior records
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    let body = json["body"].as_array().unwrap();
    assert_eq!(body.len(), 99);
    assert_eq!(body[0]["Tag"], "http.test");
    assert_eq!(body[0]["Key"], "seq");
}

#[tokio::test]
async fn should_answer_relative_range_query() {
    // given - a mock clock pinned at t = 20000s; records at 19000..19500
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    populate(&opts, 19_000, 500);
    let clock = MockClock::with_time(UNIX_EPOCH + Duration::from_secs(20_000));
    let router = QueryServer::router(opts, Arc::new(clock));

    // when - "from 900s ago to 600s ago" = (19100, 19400)
    let (status, json) = get_json(
        router,
        "/api/v1/query?time_opt=relative&start=900&end=600&units=s",
    )
    .await;

    // then - strictly-interior records 19101..19399
    assert_eq!(status, StatusCode::OK);
    let body = json["body"].as_array().unwrap();
    assert_eq!(body.len(), 299);
}

#[tokio::test]
async fn should_return_empty_body_for_inverted_range() {
    // given
    let dir = TempDir::new().unwrap();
    let opts = test_opts(&dir);
    populate(&opts, 10_000, 100);
    let router = QueryServer::router(opts, Arc::new(SystemClock));

    // when - start after end
    let (status, json) = get_json(
        router,
        "/api/v1/query?time_opt=absolute&start=1970-01-02T00:00:00Z&end=1970-01-01T00:00:00Z",
    )
    .await;

    // then - resolved to empty, not an error
    assert_eq!(status, StatusCode::OK);
    assert!(json["body"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_unknown_time_mode() {
    // given
    let dir = TempDir::new().unwrap();
    let router = QueryServer::router(test_opts(&dir), Arc::new(SystemClock));

    // when
    let (status, json) =
        get_json(router, "/api/v1/query?time_opt=sometime&start=0&end=0").await;

    // then
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn should_expose_prometheus_metrics() {
    // given
    let dir = TempDir::new().unwrap();
    let router = QueryServer::router(test_opts(&dir), Arc::new(SystemClock));

    // when
    let response = router
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // then
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("query_requests_total"));
}
