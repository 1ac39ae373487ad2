use super::handlers::{self, ReservedKeys};
use super::middleware::{log_request, trace_time};
use super::routes::{Middleware, Route, RouteError, Routes};
use axum::Extension;
use axum::http::Method;
use envstore_domain::constants::{
    INFOS_PATH, ROUTE_DELETE_VALUE, ROUTE_GET_INFOS, ROUTE_GET_KEYS, ROUTE_GET_VALUE,
    ROUTE_SAVE_VALUE,
};

const ROOT_RESERVED: ReservedKeys = ReservedKeys(&["infos"]);

/// The storage API route table with the CRUD routes mounted under `prefix`.
///
/// `prefix` is normalized first, so `"/storage"`, `"storage/"` and `"/storage/"` are
/// equivalent, and `""` or `"/"` mount the routes at the root. `/infos` is never prefixed, so
/// at the root `saveValue` refuses the key `infos`, which `/infos` would shadow.
pub fn storage_routes(prefix: &str) -> Result<Routes, RouteError> {
    let prefix = prefix.trim_matches('/');
    let base = if prefix.is_empty() { String::new() } else { format!("/{prefix}") };
    let chain = |route: Route| {
        route
            .with(Middleware::layer("trace_time", axum::middleware::from_fn(trace_time)))
            .with(Middleware::layer("log_request", axum::middleware::from_fn(log_request)))
    };

    let mut save_route =
        chain(Route::new(ROUTE_SAVE_VALUE, Method::POST, format!("{base}/"), handlers::save_value)?);
    if base.is_empty() {
        save_route = save_route.with(Middleware::layer("reserved_keys", Extension(ROOT_RESERVED)));
    }

    Routes::new()
        .with(chain(Route::new(
            ROUTE_GET_VALUE,
            Method::GET,
            format!("{base}/{{key}}"),
            handlers::get_value,
        )?))?
        .with(chain(Route::new(
            ROUTE_DELETE_VALUE,
            Method::DELETE,
            format!("{base}/{{key}}"),
            handlers::delete_value,
        )?))?
        .with(chain(Route::new(ROUTE_GET_KEYS, Method::GET, format!("{base}/"), handlers::get_keys)?))?
        .with(save_route)?
        .with(chain(Route::new(ROUTE_GET_INFOS, Method::GET, INFOS_PATH, handlers::get_infos)?))
}
