//! HTTP surface of the storage API.
//!
//! A [`Routes`] table names every endpoint together with its middleware chain;
//! [`router::build`] turns it into an [`axum::Router`] bound to an [`ApiState`].

mod api;
mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
mod routes;
mod state;

pub use api::storage_routes;
pub use error::{ApiError, ApiErrorExt};
pub use routes::{Middleware, Route, RouteError, RouteErrorExt, Routes};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
