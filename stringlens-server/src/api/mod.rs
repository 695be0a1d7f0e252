// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

pub mod health;
pub mod natural_language;
pub mod strings;

pub use health::health_check;
pub use natural_language::filter_by_natural_language;
pub use strings::{create_string, delete_string, get_string, list_strings};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use stringlens_core::{StringLensError, StringProperties};
use stringlens_query::QueryTranslator;
use stringlens_storage::{RecordStore, StoredRecord};

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StringLensError> for ApiError {
    fn from(e: StringLensError) -> Self {
        match e {
            StringLensError::InvalidInput(msg) => ApiError::UnprocessableEntity(msg),
            StringLensError::DuplicateRecord { .. } => {
                ApiError::Conflict("String already exists".to_string())
            }
            StringLensError::UnparseableQuery { .. } => {
                ApiError::BadRequest("Unable to parse natural language query".to_string())
            }
            e @ StringLensError::InvalidNumericLiteral { .. } => {
                ApiError::BadRequest(e.to_string())
            }
            StringLensError::NotFound(_) => ApiError::NotFound("String not found".to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

/// Run a store operation on the blocking thread pool
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> stringlens_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task panicked: {}", e)))?
        .map_err(ApiError::from)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub translator: Arc<QueryTranslator>,
    /// Longest natural-language query accepted, in bytes
    pub max_query_length: usize,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, max_query_length: usize) -> Self {
        Self {
            store,
            translator: Arc::new(QueryTranslator::new()),
            max_query_length,
            started_at: Instant::now(),
        }
    }
}

/// Stored record as returned to clients
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: String,
    pub value: String,
    pub properties: StringProperties,
    pub created_at: DateTime<Utc>,
}

impl From<StoredRecord> for RecordView {
    fn from(stored: StoredRecord) -> Self {
        let properties = stored.record.properties();
        Self {
            id: stored.record.id,
            value: stored.record.value,
            properties,
            created_at: stored.created_at,
        }
    }
}
