use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use termweb_proto::{CommandResponse, CommandStatus, COMMAND_PATH, HEALTH_PATH};
use tower::ServiceExt;

fn command_request(command: &str) -> Request<Body> {
    let body = serde_json::json!({ "command": command }).to_string();
    Request::post(COMMAND_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

async fn send(app: &Router, command: &str) -> CommandResponse {
    let response = app
        .clone()
        .oneshot(command_request(command))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("command response json")
}

#[test_timeout::tokio_timeout_test(10)]
async fn health_reports_ok() {
    let app = termweb_server::router(termweb_server::shared_shell());
    let response = app
        .oneshot(Request::get(HEALTH_PATH).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], br#"{"status":"ok"}"#);
}

#[test_timeout::tokio_timeout_test(10)]
async fn state_persists_across_requests() {
    let app = termweb_server::router(termweb_server::shared_shell());

    assert_eq!(send(&app, "mkdir projects").await, CommandResponse::ok("", "/"));
    assert_eq!(
        send(&app, "  cd projects  ").await,
        CommandResponse::ok("", "/projects")
    );
    send(&app, "echo hello > greeting").await;

    let response = send(&app, "cat greeting").await;
    assert_eq!(response.output, "hello");
    assert_eq!(response.cwd, "/projects");
}

#[test_timeout::tokio_timeout_test(10)]
async fn errors_still_report_cwd() {
    let app = termweb_server::router(termweb_server::shared_shell());
    send(&app, "mkdir tmp").await;
    send(&app, "cd tmp").await;

    let response = send(&app, "frobnicate").await;
    assert_eq!(response.status, CommandStatus::Error);
    assert_eq!(response.output, "Unknown command: frobnicate");
    assert_eq!(response.cwd, "/tmp");
}

#[test_timeout::tokio_timeout_test(10)]
async fn clear_sets_flag_with_empty_output() {
    let app = termweb_server::router(termweb_server::shared_shell());
    let response = send(&app, "clear").await;
    assert!(response.clear);
    assert!(response.output.is_empty());
}

#[test_timeout::tokio_timeout_test(10)]
async fn malformed_body_is_rejected() {
    let app = termweb_server::router(termweb_server::shared_shell());
    let request = Request::post(COMMAND_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}
