//! Request pipeline behaviour against a mock server

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingReporter, client_for};
use holiday_client::error::{NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE};
use holiday_client::{
    ApiClient, ClientConfig, PERMISSION_DENIED_MESSAGE, SERVER_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE, Severity,
    UploadFile,
};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_requests_carry_session_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/ping")
        .match_header("authorization", "Bearer tok-1")
        .match_header("x-user-email", "a@b.com")
        .match_header(
            "x-request-time",
            Matcher::Regex(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$".to_string()),
        )
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    client
        .state()
        .session()
        .establish("tok-1", "a@b.com", &json!({ "name": "A" }));

    let body: serde_json::Value = client.get("/api/ping").await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anonymous_requests_have_no_auth_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/ping")
        .match_header("authorization", Matcher::Missing)
        .match_header("x-user-email", Matcher::Missing)
        .with_status(204)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let body: serde_json::Value = client.get("/api/ping").await.unwrap();

    assert!(body.is_null());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_navigates_once() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/holidays/1")
        .with_status(401)
        .with_body(r#"{"message":"Token expired"}"#)
        .create_async()
        .await;

    let (client, reporter) = client_for(&server.url());
    client
        .state()
        .session()
        .establish("tok-1", "a@b.com", &json!({}));

    let err = client
        .get::<serde_json::Value>("/api/holidays/1")
        .await
        .unwrap_err();

    assert_eq!(err.status(), 401);
    assert_eq!(err.message(), "Token expired");
    assert!(!client.is_authenticated());
    assert!(client.get_user_email().is_none());
    assert_eq!(reporter.navigations(), vec!["/login".to_string()]);
    assert_eq!(
        reporter.notifications(),
        vec![(Severity::Warning, SESSION_EXPIRED_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_forbidden_and_server_errors_use_fixed_messages() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/api/holidays/1")
        .with_status(403)
        .with_body(r#"{"message":"not yours"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/holidays/2")
        .with_status(503)
        .create_async()
        .await;

    let (client, reporter) = client_for(&server.url());
    client.set_auth_token("tok-1");

    let forbidden = client
        .delete::<serde_json::Value>("/api/holidays/1")
        .await
        .unwrap_err();
    assert_eq!(forbidden.status(), 403);
    assert_eq!(forbidden.message(), "not yours");

    let unavailable = client
        .get::<serde_json::Value>("/api/holidays/2")
        .await
        .unwrap_err();
    assert_eq!(unavailable.status(), 503);
    assert_eq!(unavailable.message(), "Service Unavailable");

    assert!(client.is_authenticated());
    assert!(reporter.navigations().is_empty());
    assert_eq!(
        reporter.notifications(),
        vec![
            (Severity::Error, PERMISSION_DENIED_MESSAGE.to_string()),
            (Severity::Error, SERVER_ERROR_MESSAGE.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_client_errors_surface_server_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/holidays")
        .with_status(400)
        .with_body(r#"{"message":"End date before start date","code":"INVALID_RANGE"}"#)
        .create_async()
        .await;

    let (client, reporter) = client_for(&server.url());
    let err = client
        .post::<serde_json::Value, _>("/api/holidays", &json!({}))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(
        reporter.notifications(),
        vec![(Severity::Error, "End date before start date".to_string())]
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let (client, reporter) = client_for("http://127.0.0.1:1");

    let err = client.get::<serde_json::Value>("/health").await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.status(), 0);
    assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    assert_eq!(reporter.notifications().len(), 1);
    assert_eq!(client.get_performance_metrics().errors, 1);
}

#[tokio::test]
async fn test_login_then_logout() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(
            json!({ "email": "a@b.com", "password": "secret" }),
        ))
        .with_status(200)
        .with_body(r#"{"token":"tok-9","user":{"name":"Ada"}}"#)
        .create_async()
        .await;
    let logout = server
        .mock("POST", "/auth/logout")
        .match_header("authorization", "Bearer tok-9")
        .with_status(500)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());

    client.login("a@b.com", "secret").await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.get_user_email().as_deref(), Some("a@b.com"));
    assert_eq!(client.get_current_user(), Some(json!({ "name": "Ada" })));

    client.logout().await;
    assert!(!client.is_authenticated());
    assert!(client.get_current_user().is_none());

    login.assert_async().await;
    logout.assert_async().await;
}

#[tokio::test]
async fn test_refresh_replaces_only_token() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/refresh")
        .match_header("authorization", "Bearer old")
        .with_status(200)
        .with_body(r#"{"token":"new"}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    client
        .state()
        .session()
        .establish("old", "a@b.com", &json!({}));

    client.refresh_token().await.unwrap();

    assert_eq!(client.state().session().token().as_deref(), Some("new"));
    assert_eq!(client.get_user_email().as_deref(), Some("a@b.com"));
}

#[tokio::test]
async fn test_health_check() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"UP","timestamp":"2024-07-01T10:00:00Z"}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let health = client.health_check().await.unwrap();

    assert_eq!(health.status, "UP");
}

#[tokio::test]
async fn test_silent_server_times_out_as_transport_error() {
    // Accepts connections but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let reporter = Arc::new(RecordingReporter::default());
    let config = ClientConfig::new(format!("http://{}", addr)).with_timeout(Duration::from_millis(200));
    let client = ApiClient::from_config(config)
        .unwrap()
        .with_reporter(reporter.clone());

    let err = client.get::<serde_json::Value>("/health").await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.status(), 0);
    assert_eq!(err.message(), TIMEOUT_MESSAGE);
    assert_eq!(
        reporter.notifications(),
        vec![(Severity::Error, TIMEOUT_MESSAGE.to_string())]
    );
    assert_eq!(client.get_performance_metrics().errors, 1);
}

#[tokio::test]
async fn test_metrics_count_failures() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/ok")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    server
        .mock("GET", "/broken")
        .with_status(500)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let _ = client.get::<serde_json::Value>("/ok").await;
    let _ = client.get::<serde_json::Value>("/broken").await;

    let metrics = client.get_performance_metrics();
    assert_eq!(metrics.requests, 2);
    assert_eq!(metrics.errors, 1);
    assert_eq!(metrics.error_rate, 0.5);

    client.reset_performance_metrics();
    assert_eq!(client.get_performance_metrics().requests, 0);
}

#[tokio::test]
async fn test_upload_sends_file_and_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/holidays/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="plan.xlsx""#.to_string()),
            Matcher::Regex(r#"name="userEmail""#.to_string()),
            Matcher::Regex(r#"name="destination""#.to_string()),
            Matcher::Regex("Lisbon".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":7}"#)
        .create_async()
        .await;

    let (client, reporter) = client_for(&server.url());
    let file = UploadFile::new("plan.xlsx", b"spreadsheet bytes".to_vec());
    let extra = json!({ "userEmail": "a@b.com", "destination": "Lisbon" });

    let created: serde_json::Value = client
        .upload_file("/api/holidays/upload", file, Some(&extra))
        .await
        .unwrap();

    assert_eq!(created["id"], 7);
    assert_eq!(reporter.progress().last(), Some(&100));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_saves_file() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/files/report")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body("%PDF-1.4 fake")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (client, _) = client_for(&server.url());

    let saved = client
        .download_file("/files/report", dir.path(), Some("../report.pdf"))
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("report.pdf"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.4 fake");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_failed_download_writes_nothing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/files/missing")
        .with_status(404)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (client, _) = client_for(&server.url());

    let err = client
        .download_file("/files/missing", dir.path(), None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_event_source_passes_token_and_decodes_events() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/holidays/3/updates")
        .match_query(Matcher::UrlEncoded("token".into(), "tok-1".into()))
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body("event: update\ndata: {\"id\":3}\n\ndata: second\n\n")
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    client.set_auth_token("tok-1");

    let mut stream = client
        .create_event_source("/api/holidays/3/updates")
        .await
        .unwrap();

    let first = stream.next_event().await.unwrap().unwrap();
    assert_eq!(first.event.as_deref(), Some("update"));
    assert_eq!(first.data, r#"{"id":3}"#);

    let second = stream.next_event().await.unwrap().unwrap();
    assert_eq!(second.data, "second");

    assert!(stream.next_event().await.is_none());
}

#[tokio::test]
async fn test_cached_get_hits_server_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/destinations")
        .with_status(200)
        .with_body(r#"["Lisbon","Kyoto"]"#)
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let fetch = |client: ApiClient| async move { client.get::<Vec<String>>("/api/destinations").await };

    let ttl = std::time::Duration::from_secs(60);
    let first: Vec<String> = client
        .get_cached("destinations", || fetch(client.clone()), ttl)
        .await
        .unwrap();
    let second: Vec<String> = client
        .get_cached("destinations", || fetch(client.clone()), ttl)
        .await
        .unwrap();

    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancelled_call_yields_cancelled() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/slow")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let (client, _) = client_for(&server.url());
    let handle = client.create_cancel_handle();
    handle.cancel();

    let err = handle
        .run(client.get::<serde_json::Value>("/slow"))
        .await
        .unwrap_err();

    assert!(matches!(err, holiday_client::ClientError::Cancelled));
}
