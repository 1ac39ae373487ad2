pub use crate::domain::config::ApiConfig;
pub use crate::server::router;
pub use crate::server::{
    ApiError, ApiState, Middleware, Route, RouteError, Routes, storage_routes,
};
pub use crate::storage::{SharedStorage, Storage};
