use super::routes::Routes;
use super::state::ApiState;
use axum::Router;
use tracing::debug;

/// Composes the route table into a router bound to `state`.
///
/// Each pattern answers with and without a trailing slash. Requests matching no pattern
/// get axum's `404`, a known pattern with the wrong method gets `405`.
pub fn build(routes: &Routes, state: ApiState) -> Router {
    routes
        .iter()
        .fold(Router::new(), |router, route| {
            debug!(
                name = route.name(),
                method = %route.method(),
                pattern = route.pattern(),
                middlewares = route.middlewares().len(),
                "Registering route"
            );
            slash_variants(route.pattern())
                .into_iter()
                .fold(router, |router, path| router.route(&path, route.service()))
        })
        .with_state(state)
}

/// `/x` and `/x/` for any pattern except the root.
fn slash_variants(pattern: &str) -> Vec<String> {
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.is_empty() {
        return vec!["/".to_owned()];
    }
    vec![trimmed.to_owned(), format!("{trimmed}/")]
}
