mod support;

use std::time::{Duration, Instant};

use serde_json::json;
use support::{MockResponse, MockServer};
use tdec_client::{ClientError, DecisionClient, JobProgress};

const JOB: &str = "/queues/basicSearch/jobs/42";

/// A search that never finishes, polled every ten seconds.
fn slow_search() -> (MockServer, std::sync::Arc<DecisionClient>) {
    let server = MockServer::start();
    server.allow_login("tok");
    server.on("GET", "/search/ABL1", [MockResponse::json(200, json!({"id": 42}))]);
    server.on("GET", JOB, [MockResponse::json(200, json!({"progress": 5}))]);
    let mut config = server.config();
    config.polling.interval_ms = 10_000;
    let client = std::sync::Arc::new(DecisionClient::new(config).unwrap());
    (server, client)
}

#[tokio::test]
async fn cancel_interrupts_the_poll_interval() {
    let (server, client) = slow_search();
    let task = client.spawn_search("ABL1");
    let mut progress = task.progress();

    progress
        .wait_for(|p| matches!(p, JobProgress::Polling { .. }))
        .await
        .unwrap();
    let started = Instant::now();
    task.cancel();
    let result = task.join().await;

    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(server.count("GET", JOB), 1);
}

#[tokio::test]
async fn cancelled_before_start_sends_nothing() {
    let (server, client) = slow_search();
    let task = client.spawn_export(101);
    task.cancel();

    assert!(matches!(task.join().await, Err(ClientError::Cancelled)));
    assert!(server.requests_to("POST", "/exports/structure").is_empty());
}

#[tokio::test]
async fn progress_reports_the_submitted_job() {
    let (_server, client) = slow_search();
    let task = client.spawn_search("ABL1");
    let mut progress = task.progress();

    let seen = progress
        .wait_for(|p| matches!(p, JobProgress::Polling { .. }))
        .await
        .unwrap()
        .clone();
    assert!(matches!(
        seen,
        JobProgress::Polling { attempt: 1, percent: Some(5), .. }
    ));
    task.cancel();
    let _ = task.join().await;
}
