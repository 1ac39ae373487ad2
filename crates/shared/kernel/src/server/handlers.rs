//! CRUD handlers over the [`Storage`](envstore_storage::Storage) contract.
//!
//! Absent keys are answered with `404` and an empty body. They are normal control flow and
//! never logged as errors.

use super::error::{ApiError, ApiErrorExt};
use super::state::ApiState;
use axum::{Extension, Json};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use envstore_domain::constants::EnvironmentKey;
use envstore_domain::models::{ApiInfo, StoreEntry};
use envstore_storage::SharedStorage;
use fxhash::FxHashSet;
use serde_json::Value;
use tracing::debug;

pub const APP_NAME: &str = "envstore";

const ENTRY_SHAPE: &str = "Expected {\"key\": string, \"value\": string}";

/// Keys `save_value` refuses because a fixed route answers their path.
#[derive(Debug, Clone, Copy)]
pub struct ReservedKeys(pub &'static [&'static str]);

impl ReservedKeys {
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|reserved| *reserved == key)
    }
}

/// `GET {prefix}/{key}`
pub async fn get_value(
    State(storage): State<SharedStorage>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    if !storage.contains(&key).await.context("Checking key")? {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }
    let Some(value) = storage.get(&key).await.context("Reading key")? else {
        // Deleted between the two calls.
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let value = String::from_utf8_lossy(&value).into_owned();
    Ok(Json(StoreEntry { key, value }).into_response())
}

/// `DELETE {prefix}/{key}`
pub async fn delete_value(
    State(storage): State<SharedStorage>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    if storage.delete(&key).await.context("Deleting key")? {
        debug!(%key, "Key deleted");
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// `GET {prefix}/`, sorted.
pub async fn get_keys(State(storage): State<SharedStorage>) -> Result<Json<Vec<String>>, ApiError> {
    let mut keys = storage.keys().await.context("Listing keys")?;
    keys.sort_unstable();
    Ok(Json(keys))
}

/// `POST {prefix}/` with `{"key": .., "value": ..}`. Only a JSON object is accepted.
pub async fn save_value(
    State(storage): State<SharedStorage>,
    reserved: Option<Extension<ReservedKeys>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest {
        message: rejection.body_text().into(),
        context: Some(ENTRY_SHAPE.into()),
    })?;
    if !payload.is_object() {
        return Err(ApiError::BadRequest {
            message: "Request body is not a JSON object".into(),
            context: Some(ENTRY_SHAPE.into()),
        });
    }
    let entry: StoreEntry = serde_json::from_value(payload).map_err(|e| ApiError::BadRequest {
        message: e.to_string().into(),
        context: Some(ENTRY_SHAPE.into()),
    })?;

    if let Some(Extension(reserved)) = reserved
        && reserved.contains(&entry.key)
    {
        return Err(ApiError::BadRequest {
            message: format!("Key \"{}\" is shadowed by a fixed route", entry.key).into(),
            context: None,
        });
    }

    storage.store_string(&entry.key, &entry.value).await.context("Saving key")?;
    debug!(key = %entry.key, "Key saved");
    Ok(StatusCode::CREATED)
}

/// `GET /infos`: which environment fields are currently stored.
pub async fn get_infos(State(state): State<ApiState>) -> Result<Json<ApiInfo>, ApiError> {
    let storage = &state.storage;
    let policy = storage.policy();

    let keys = storage.keys().await.context("Listing keys")?;
    let stored: FxHashSet<EnvironmentKey> = keys
        .iter()
        .filter(|k| k.starts_with(policy.domain()))
        .filter_map(|k| EnvironmentKey::from_field(policy.strip_prefix(k)))
        .collect();

    let environment = EnvironmentKey::ALL
        .into_iter()
        .map(|field| (field.to_string(), stored.contains(&field)))
        .collect();

    Ok(Json(ApiInfo {
        name: APP_NAME.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        backend: storage.backend().to_owned(),
        environment,
    }))
}
