//! End-to-end tests for the HTTP API, driving the router in-process

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use synaptic::{
    application::ProblemDetails,
    build_router,
    domain::chat_service::{ChatError, ChatProvider},
    AppConfig, AppState, Conversation, SymbolicSolver,
};

const BOUNDARY: &str = "synaptic-test-boundary";

/// Echoes the last message after `delay`, or fails when asked to
struct StubProvider {
    fail: bool,
    delay: Duration,
}

#[async_trait]
impl ChatProvider for StubProvider {
    async fn complete(&self, conversation: &Conversation) -> Result<String, ChatError> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(ChatError::Provider("upstream unavailable".to_string()));
        }
        let last = conversation.messages().last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(format!("echo: {}", last.trim()))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn app_with_provider(config: &AppConfig, provider: StubProvider) -> Router {
    let state = AppState::new(
        Arc::new(SymbolicSolver::with_limits(config.solver.limits())),
        Arc::new(provider),
    )
    .with_preview_rows(config.upload.preview_rows);
    build_router(state, config)
}

fn app_with(config: &AppConfig, failing_chat: bool) -> Router {
    let provider = StubProvider {
        fail: failing_chat,
        delay: Duration::ZERO,
    };
    app_with_provider(config, provider)
}

fn app() -> Router {
    app_with(&AppConfig::default(), false)
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload-data")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn solve(equation: &str) -> (StatusCode, Value) {
    send(app(), json_request("/solve-equation", json!({ "equation": equation }))).await
}

async fn solution_of(equation: &str) -> String {
    let (status, body) = solve(equation).await;
    assert_eq!(status, StatusCode::OK, "equation {equation:?} failed: {body}");
    body["solution"].as_str().unwrap().to_string()
}

fn detail(body: &Value) -> &str {
    body["detail"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_solve_linear_and_quadratic() {
    assert_eq!(solution_of("x = 5").await, "[5]");
    assert_eq!(solution_of("x^2 - 4 = 0").await, "[-2, 2]");
    assert_eq!(solution_of("x + 1").await, "[-1]");
    assert_eq!(solution_of("2*x + 3 = 0").await, "[-3/2]");
    assert_eq!(solution_of("x^2 + 1 = 0").await, "[-I, I]");
}

#[tokio::test]
async fn test_solve_equals_is_subtraction() {
    let pairs = [
        ("x^2 + 2*x = 3", "x^2 + 2*x - (3)"),
        ("x/2 = x - 1", "x/2 - (x - 1)"),
        ("(x - 1)*(x + 4) = 6", "(x - 1)*(x + 4) - (6)"),
    ];

    for (equation, difference) in pairs {
        assert_eq!(solution_of(equation).await, solution_of(difference).await);
    }
}

#[tokio::test]
async fn test_solve_is_idempotent() {
    let first = solution_of("x^3 - 6*x^2 + 11*x - 6 = 0").await;
    let second = solution_of("x^3 - 6*x^2 + 11*x - 6 = 0").await;
    assert_eq!(first, "[1, 2, 3]");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_solve_quartics_that_split_into_quadratics() {
    assert_eq!(
        solution_of("x^4 - 4 = 0").await,
        "[-sqrt(2), sqrt(2), -sqrt(2)*I, sqrt(2)*I]"
    );
    assert_eq!(
        solution_of("x^4 - 5*x^2 + 6 = 0").await,
        "[-sqrt(2), sqrt(2), -sqrt(3), sqrt(3)]"
    );
}

#[tokio::test]
async fn test_solve_with_large_coefficients() {
    assert_eq!(
        solution_of("x^2 = 10^40").await,
        "[-100000000000000000000, 100000000000000000000]"
    );
    assert_eq!(
        solution_of("x^3 = 8000000000000000000").await,
        "[2000000, -1000000 - 1000000*sqrt(3)*I, -1000000 + 1000000*sqrt(3)*I]"
    );
}

#[tokio::test]
async fn test_solve_signed_operands() {
    assert_eq!(solution_of("x - -2 = 0").await, "[-2]");
    assert_eq!(solution_of("x = 3 - -1").await, "[4]");
}

#[tokio::test]
async fn test_solve_deeply_nested_input_is_rejected() {
    let nested = format!("{}x{} = 1", "(".repeat(5000), ")".repeat(5000));
    let (status, body) = solve(&nested).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("expression nested too deeply"), "{body}");

    // the server keeps answering afterwards
    assert_eq!(solution_of("x = 1").await, "[1]");
}

#[tokio::test]
async fn test_solve_empty_input() {
    for equation in ["", "   \t"] {
        let (status, body) = solve(equation).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail(&body), "empty equation");
    }
}

#[tokio::test]
async fn test_solve_parse_errors() {
    for equation in ["x ++ 2 = 0", "2x = 4", "x = 1 = 2", "(x + 1 = 0"] {
        let (status, body) = solve(equation).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{equation}");
        assert!(
            detail(&body).starts_with("could not solve equation"),
            "{equation}: {body}"
        );
    }
}

#[tokio::test]
async fn test_solve_unsupported_input() {
    let (status, body) = solve("y + 1 = 0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("unsupported symbol 'y'"));

    let (status, body) = solve("x^5 + x + 1 = 0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("could not solve equation"));
}

#[tokio::test]
async fn test_solve_rejects_malformed_body() {
    let (status, body) = send(app(), json_request("/solve-equation", json!({ "eq": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let problem: ProblemDetails = serde_json::from_value(body).unwrap();
    assert_eq!(problem.status, 400);
}

#[tokio::test]
async fn test_error_responses_are_problem_documents() {
    let response = app()
        .oneshot(json_request("/solve-equation", json!({ "equation": "" })))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
}

#[tokio::test]
async fn test_slow_requests_time_out() {
    let mut config = AppConfig::default();
    config.server.request_timeout_secs = 1;
    let slow = StubProvider {
        fail: false,
        delay: Duration::from_secs(3),
    };

    let request = json_request(
        "/chat",
        json!({ "messages": [{ "role": "user", "content": "hello" }] }),
    );
    let (status, _) = send(app_with_provider(&config, slow), request).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_chat_forwards_conversation() {
    let body = json!({
        "messages": [
            { "role": "system", "content": "You are an engineering assistant." },
            { "role": "user", "content": "  size this beam  " }
        ]
    });
    let (status, body) = send(app(), json_request("/chat", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "echo: size this beam" }));
}

#[tokio::test]
async fn test_chat_validates_messages() {
    let (status, body) = send(app(), json_request("/chat", json!({ "messages": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("invalid conversation"));

    let bad_role = json!({ "messages": [{ "role": "tool", "content": "x" }] });
    let (status, body) = send(app(), json_request("/chat", bad_role)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).contains("unknown role 'tool'"));
}

#[tokio::test]
async fn test_chat_provider_failure_is_500() {
    let app = app_with(&AppConfig::default(), true);
    let body = json!({ "messages": [{ "role": "user", "content": "hi" }] });
    let (status, body) = send(app, json_request("/chat", body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        detail(&body),
        "language model request failed: upstream unavailable"
    );
}

#[tokio::test]
async fn test_upload_csv_preview() {
    let csv = "load,span,material\n10,2.5,steel\n12,3.0,wood\n8,1.5\n20,4.0,steel\n5,1.0,steel\n7,2.0,concrete\n";
    let (status, body) =
        send(app(), multipart_request("file", "beams.csv", csv.as_bytes())).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["filename"], "beams.csv");
    assert_eq!(body["columns"], json!(["load", "span", "material"]));
    assert_eq!(body["row_count"], 6);

    let preview = body["preview"].as_array().unwrap();
    assert_eq!(preview.len(), 5);
    assert_eq!(preview[0], json!({ "load": "10", "span": "2.5", "material": "steel" }));
    assert_eq!(preview[2], json!({ "load": "8", "span": "1.5", "material": null }));
}

#[tokio::test]
async fn test_upload_respects_preview_rows() {
    let mut config = AppConfig::default();
    config.upload.preview_rows = 1;

    let (status, body) = send(
        app_with(&config, false),
        multipart_request("file", "a.csv", b"a\n1\n2\n3\n"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["row_count"], 3);
    assert_eq!(body["preview"], json!([{ "a": "1" }]));
}

#[tokio::test]
async fn test_upload_rejects_unsupported_extension() {
    let (status, body) = send(app(), multipart_request("file", "notes.txt", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("unsupported file type 'txt'"));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (status, body) = send(app(), multipart_request("attachment", "a.csv", b"a\n1\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail(&body), "no file was uploaded");
}

#[tokio::test]
async fn test_upload_invalid_utf8_csv() {
    let (status, body) =
        send(app(), multipart_request("file", "bad.csv", &[0xff, 0xfe, b'\n'])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("could not process file"));
}

#[tokio::test]
async fn test_upload_body_limit() {
    let mut config = AppConfig::default();
    config.upload.max_upload_size_mb = 1;

    let big = vec![b'a'; 2 * 1024 * 1024];
    let response = app_with(&config, false)
        .oneshot(multipart_request("file", "big.csv", &big))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_static_files_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Synaptic</h1>").unwrap();

    let mut config = AppConfig::default();
    config.server.static_dir = Some(dir.path().to_path_buf());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app_with(&config, false).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"<h1>Synaptic</h1>");

    // API routes still win over the fallback
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, _) = send(app_with(&config, false), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_without_static_dir() {
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
