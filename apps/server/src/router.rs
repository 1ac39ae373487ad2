use axum::Router;
use envstore_kernel::prelude::{ApiState, Routes, router};
use tower_http::trace::TraceLayer;

pub(crate) fn init(routes: &Routes, state: ApiState) -> Router {
    router::build(routes, state).layer(TraceLayer::new_for_http())
}
