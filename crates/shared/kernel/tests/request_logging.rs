use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use envstore_kernel::prelude::*;
use envstore_kernel::storage::MockStorage;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use tracing::Level;
use tracing::subscriber::DefaultGuard;

fn app(storage: &MockStorage) -> Router {
    let state = ApiState::builder().storage(Arc::new(storage.clone())).build().unwrap();
    router::build(&storage_routes("/storage").unwrap(), state)
}

fn trace_enabled() -> DefaultGuard {
    let subscriber =
        tracing_subscriber::fmt().with_max_level(Level::TRACE).with_test_writer().finish();
    tracing::subscriber::set_default(subscriber)
}

async fn post(app: Router, body: String) -> StatusCode {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/storage/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn logged_body_reaches_the_handler() {
    let _trace = trace_enabled();
    assert!(tracing::enabled!(Level::TRACE));

    let storage = MockStorage::new();
    let status = post(app(&storage), json!({"key": "k1", "value": "v1"}).to_string()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(storage.get("k1").await.unwrap(), Some(b"v1".to_vec()));

    let request = Request::builder().uri("/storage/k1").body(Body::empty()).unwrap();
    let response = app(&storage).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap()["value"], "v1");
}

#[tokio::test]
async fn log_level_does_not_change_the_response() {
    let value = "x".repeat(1_200_000);
    let body = json!({"key": "big", "value": value}).to_string();

    let quiet = MockStorage::new();
    let quiet_status = post(app(&quiet), body.clone()).await;

    let traced = MockStorage::new();
    let traced_status = {
        let _trace = trace_enabled();
        post(app(&traced), body).await
    };

    assert_eq!(quiet_status, StatusCode::CREATED);
    assert_eq!(traced_status, quiet_status);
    assert_eq!(traced.get("big").await.unwrap().as_deref().map(<[u8]>::len), Some(1_200_000));
}
