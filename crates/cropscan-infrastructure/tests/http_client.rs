//! HttpApiClient against a local axum backend.

use axum::Router;
use axum::extract::{Json, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use cropscan_core::api::{ApiClient, ApiErrorKind, MSG_NO_RESPONSE, endpoints};
use cropscan_core::config::ApiSettings;
use cropscan_infrastructure::HttpApiClient;
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn echo_auth(headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "authorization": auth }))
}

async fn no_diseases() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "No diseases in database" })),
    )
}

async fn update(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "id": id, "solution": body["solution"] }))
}

async fn signup_conflict() -> (StatusCode, Json<Value>) {
    (StatusCode::CONFLICT, Json(json!({ "message": "User already exists" })))
}

fn backend() -> Router {
    Router::new()
        .route("/whoami", get(echo_auth))
        .route(endpoints::GET_DISEASES, get(no_diseases))
        .route("/update_disease/:id", put(update))
        .route(endpoints::CLEAR_DISEASES, delete(|| async { StatusCode::NO_CONTENT }))
        .route(endpoints::SIGN_UP, post(signup_conflict))
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kaboom") }),
        )
        .route("/plain", get(|| async { "pong" }))
}

async fn spawn_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, backend()).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> HttpApiClient {
    HttpApiClient::new(&ApiSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_bearer_header_follows_token() {
    let base = spawn_backend().await;
    let api = client(&base);

    let body = api.get("/whoami").await.unwrap();
    assert_eq!(body["authorization"], Value::Null);

    api.set_bearer_token(Some("tok-123".into()));
    let body = api.get("/whoami").await.unwrap();
    assert_eq!(body["authorization"], "Bearer tok-123");

    api.set_bearer_token(None);
    let body = api.get("/whoami").await.unwrap();
    assert_eq!(body["authorization"], Value::Null);
}

#[tokio::test]
async fn test_not_found_keeps_backend_payload() {
    let base = spawn_backend().await;
    let err = client(&base).get(endpoints::GET_DISEASES).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::NotFound);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message.as_deref(), Some("No diseases in database"));
    assert_eq!(
        err.payload,
        Some(json!({ "error": "No diseases in database" }))
    );
}

#[tokio::test]
async fn test_put_sends_json_body() {
    let base = spawn_backend().await;
    let body = client(&base)
        .put(
            &endpoints::update_disease(7),
            Some(json!({ "solution": "Prune" })),
        )
        .await
        .unwrap();
    assert_eq!(body, json!({ "id": 7, "solution": "Prune" }));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let base = spawn_backend().await;
    let body = client(&base).delete(endpoints::CLEAR_DISEASES).await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_plain_text_success_body_is_string() {
    let base = spawn_backend().await;
    let body = client(&base).get("/plain").await.unwrap();
    assert_eq!(body, Value::String("pong".into()));
}

#[tokio::test]
async fn test_server_error_without_json_uses_generic_text() {
    let base = spawn_backend().await;
    let err = client(&base).get("/boom").await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Server);
    assert_eq!(err.status, Some(500));
    assert!(err.payload.is_none());
    assert_eq!(
        err.display_message("Failed to fetch diseases", None),
        "Server error. Please try again later."
    );
}

#[tokio::test]
async fn test_conflict_prefers_backend_message() {
    let base = spawn_backend().await;
    let err = client(&base)
        .post(
            endpoints::SIGN_UP,
            Some(json!({ "name": "ana", "email": "ana@farm.io", "password": "pw" })),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Conflict);
    assert_eq!(err.display_message("Signup failed", None), "User already exists");
}

#[tokio::test]
async fn test_unreachable_backend_is_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .get(endpoints::GET_DISEASES)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::NoResponse);
    assert_eq!(err.status, None);
    assert_eq!(err.display_message("Failed to fetch diseases", None), MSG_NO_RESPONSE);
}
