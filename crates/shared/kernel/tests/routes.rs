use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{Next, from_fn};
use envstore_kernel::domain::constants::{MANDATORY_ROUTES, ROUTE_GET_INFOS};
use envstore_kernel::prelude::*;
use envstore_kernel::server::ApiStateError;
use envstore_kernel::storage::MockStorage;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

type Trail = Arc<Mutex<Vec<String>>>;

fn state() -> ApiState {
    ApiState::builder().storage(Arc::new(MockStorage::new())).build().unwrap()
}

fn recorder(label: &'static str, trail: &Trail) -> Middleware {
    let trail = trail.clone();
    Middleware::layer(
        label,
        from_fn(move |request: Request, next: Next| {
            let trail = trail.clone();
            async move {
                trail.lock().unwrap().push(format!("{label}:in"));
                let response = next.run(request).await;
                trail.lock().unwrap().push(format!("{label}:out"));
                response
            }
        }),
    )
}

#[tokio::test]
async fn first_middleware_is_outermost() {
    let trail = Trail::default();
    let handler_trail = trail.clone();
    let handler = move || {
        let trail = handler_trail.clone();
        async move {
            trail.lock().unwrap().push("handler".to_owned());
            "done"
        }
    };

    let routes = Routes::new()
        .with(
            Route::new("ping", Method::GET, "/ping", handler)
                .unwrap()
                .with(recorder("first", &trail))
                .with(recorder("second", &trail))
                .with(recorder("third", &trail)),
        )
        .unwrap();

    let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();
    let response = router::build(&routes, state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(to_bytes(response.into_body(), usize::MAX).await.unwrap(), "done");

    assert_eq!(
        *trail.lock().unwrap(),
        ["first:in", "second:in", "third:in", "handler", "third:out", "second:out", "first:out"]
    );
}

#[tokio::test]
async fn middlewares_stay_on_their_route() {
    let trail = Trail::default();
    let routes = Routes::new()
        .with(Route::new("a", Method::GET, "/a", || async { "a" }).unwrap().with(recorder("a", &trail)))
        .unwrap()
        .with(Route::new("b", Method::POST, "/a", || async { "b" }).unwrap())
        .unwrap();

    let request = Request::builder().method(Method::POST).uri("/a").body(Body::empty()).unwrap();
    let response = router::build(&routes, state()).oneshot(request).await.unwrap();
    assert_eq!(to_bytes(response.into_body(), usize::MAX).await.unwrap(), "b");
    assert!(trail.lock().unwrap().is_empty());
}

#[test]
fn route_lookup_by_name() {
    let routes = storage_routes("/storage").unwrap();
    assert_eq!(routes.len(), 5);

    let route = routes.route("getValue").unwrap();
    assert_eq!(route.method(), &Method::GET);
    assert_eq!(route.pattern(), "/storage/{key}");
    let names: Vec<_> = route.middlewares().iter().map(Middleware::name).collect();
    assert_eq!(names, ["trace_time", "log_request"]);

    assert_eq!(routes.route(ROUTE_GET_INFOS).unwrap().pattern(), "/infos");
    routes.require(MANDATORY_ROUTES).unwrap();
}

#[test]
fn missing_route_names_the_request() {
    let routes = storage_routes("/storage").unwrap();
    let err = routes.route("putValue").unwrap_err();
    assert!(matches!(&err, RouteError::NotFound { name } if name == "putValue"));
    assert_eq!(err.to_string(), "The requested route \"putValue\" is missing");

    assert!(Routes::new().require(MANDATORY_ROUTES).is_err());
}

#[test]
fn prefix_is_normalized() {
    for prefix in ["/kv", "kv", "/kv/", "kv/"] {
        let routes = storage_routes(prefix).unwrap();
        assert_eq!(routes.route("getKeys").unwrap().pattern(), "/kv/");
        assert_eq!(routes.route("deleteValue").unwrap().pattern(), "/kv/{key}");
    }
    let routes = storage_routes("").unwrap();
    assert_eq!(routes.route("saveValue").unwrap().pattern(), "/");
}

#[test]
fn duplicate_names_are_rejected() {
    let err = Routes::new()
        .with(Route::new("x", Method::GET, "/x", || async {}).unwrap())
        .unwrap()
        .with(Route::new("x", Method::POST, "/y", || async {}).unwrap())
        .unwrap_err();
    assert!(matches!(err, RouteError::DuplicateName { .. }));
}

#[test]
fn same_method_and_path_is_rejected() {
    let err = Routes::new()
        .with(Route::new("x", Method::GET, "/x", || async {}).unwrap())
        .unwrap()
        .with(Route::new("y", Method::GET, "/x/", || async {}).unwrap())
        .unwrap_err();
    assert!(matches!(err, RouteError::Overlap { .. }));
}

#[test]
fn unsupported_method_is_rejected() {
    let method = Method::from_bytes(b"PURGE").unwrap();
    let err = Route::new("purge", method, "/x", || async {}).unwrap_err();
    assert!(matches!(err, RouteError::UnsupportedMethod { .. }));
}

#[test]
fn relative_pattern_is_rejected() {
    let err = Route::new("x", Method::GET, "x", || async {}).unwrap_err();
    assert!(matches!(err, RouteError::InvalidPattern { .. }));
}

#[test]
fn state_requires_storage() {
    let err = ApiState::builder().config(ApiConfig::default()).build().unwrap_err();
    assert!(matches!(err, ApiStateError::Validation { .. }));
}
