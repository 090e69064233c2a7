mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use support::{API_KEY, LOGIN, MockResponse, MockServer};
use tdec_client::{ClientError, DecisionClient};
use tdec_config::ConfigStore;

#[tokio::test]
async fn login_exchanges_api_key_for_token() {
    let server = MockServer::start();
    server.allow_login("tok-1");
    let client = server.client();

    assert!(client.is_configured());
    assert!(client.login().await);
    assert_eq!(client.session().token(), Some("tok-1"));

    let logins = server.requests_to("GET", LOGIN);
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].header("dng-api-key"), Some(API_KEY));
}

#[tokio::test]
async fn login_without_access_token_fails() {
    let server = MockServer::start();
    server.on("GET", LOGIN, [MockResponse::json(200, json!({"token": "x"}))]);
    let client = server.client();

    assert!(!client.login().await);
    assert!(!client.has_token());
}

#[tokio::test]
async fn authenticated_calls_send_bearer_and_version_headers() {
    let server = MockServer::start();
    server.allow_login("tok-1");
    server.on("GET", "/projects", [MockResponse::json(200, json!([]))]);
    let client = server.client();

    client.list_projects().await.unwrap();

    let calls = server.requests_to("GET", "/projects");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].header("authorization"), Some("Bearer tok-1"));
    assert_eq!(calls[0].header("x-api-version"), Some("1"));
    assert_eq!(calls[0].header("dng-api-key"), None);
    assert!(calls[0].header("user-agent").is_some_and(|ua| ua.starts_with("tdec/")));
}

#[tokio::test]
async fn rejected_token_triggers_one_relogin_and_one_retry() {
    let server = MockServer::start();
    server.allow_login("fresh");
    server.on(
        "GET",
        "/projects",
        [
            MockResponse::text(401, "expired"),
            MockResponse::json(200, json!({"projects": [{"project_id": 1, "project_label": "A"}]})),
        ],
    );
    let mut config = server.config();
    config.api.token = "stale".into();
    let client = DecisionClient::new(config).unwrap();

    let projects = client.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);

    assert_eq!(server.count("GET", LOGIN), 1);
    let calls = server.requests_to("GET", "/projects");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].header("authorization"), Some("Bearer stale"));
    assert_eq!(calls[1].header("authorization"), Some("Bearer fresh"));
    assert_eq!(client.session().token(), Some("fresh"));
}

#[tokio::test]
async fn failed_relogin_gives_up_without_looping() {
    let server = MockServer::start();
    server.on("GET", LOGIN, [MockResponse::text(401, "bad key")]);
    server.on("GET", "/projects", [MockResponse::text(403, "forbidden")]);
    let mut config = server.config();
    config.api.token = "stale".into();
    let client = DecisionClient::new(config).unwrap();

    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthenticationFailure(_)), "{err}");
    assert!(err.needs_reconfiguration());
    assert_eq!(server.count("GET", LOGIN), 1);
    assert_eq!(server.count("GET", "/projects"), 1);
    assert!(!client.has_token());
}

#[tokio::test]
async fn unconfigured_client_makes_no_calls() {
    let client = DecisionClient::new(tdec_config::TdecConfig::default()).unwrap();
    assert!(!client.test_connection().await);
    assert!(matches!(
        client.list_projects().await,
        Err(ClientError::NotConfigured)
    ));
}

#[tokio::test]
async fn failed_reconfiguration_restores_previous_session() {
    let good = MockServer::start();
    good.allow_login("tok-good");
    let bad = MockServer::start();
    bad.on("GET", LOGIN, [MockResponse::text(401, "nope")]);

    let client = good.client();
    assert!(client.login().await);

    assert!(!client.reconfigure_and_test(bad.url(), "wrong-key").await);
    let session = client.session();
    assert_eq!(session.base_url(), Some(good.url()));
    assert_eq!(session.api_key(), Some(API_KEY));
    assert_eq!(session.token(), Some("tok-good"));
    assert_eq!(bad.count("GET", LOGIN), 1);
}

#[tokio::test]
async fn successful_reconfiguration_switches_servers() {
    let first = MockServer::start();
    first.allow_login("tok-a");
    let second = MockServer::start();
    second.allow_login("tok-b");

    let client = first.client();
    assert!(client.login().await);
    let host = second.url().trim_start_matches("http://");
    assert!(client.reconfigure_and_test(&format!("{host}/"), "key-b").await);

    let session = client.session();
    assert_eq!(session.base_url(), Some(second.url()));
    assert_eq!(session.token(), Some("tok-b"));
    assert_eq!(
        second.requests_to("GET", LOGIN)[0].header("dng-api-key"),
        Some("key-b")
    );
}

#[tokio::test]
async fn token_and_preferences_are_persisted() {
    let server = MockServer::start();
    server.allow_login("tok-saved");
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("tdec").join("config.toml"));

    let client = DecisionClient::with_store(server.config(), store.clone()).unwrap();
    assert!(client.login().await);
    client.set_logging_enabled(true).unwrap();

    let saved = std::fs::read_to_string(store.path()).unwrap();
    let saved: tdec_config::TdecConfig = toml::from_str(&saved).unwrap();
    assert_eq!(saved.api.token, "tok-saved");
    assert_eq!(saved.api.base_url, server.url());
    assert!(saved.general.logging_enabled);

    client.logout().unwrap();
    let saved = std::fs::read_to_string(store.path()).unwrap();
    let saved: tdec_config::TdecConfig = toml::from_str(&saved).unwrap();
    assert_eq!(saved.api.token, "");
}
