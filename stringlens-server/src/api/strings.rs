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

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use stringlens_core::{analyze, FilterSet};
use stringlens_storage::{DeleteOutcome, InsertOutcome};
use tracing::{debug, info};

use crate::api::{run_blocking, ApiError, AppState, RecordView};
use crate::validation::{extract_value, filters_from_params, StringQueryParams};

/// Response body for `GET /strings`
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<RecordView>,
    pub count: usize,
    pub filters_applied: FilterSet,
}

/// POST /strings
///
/// Analyzes `value` and stores the result. Responds 409 when a string with the
/// same canonical form is already stored. A body that is not a JSON document
/// (wrong content type, empty, malformed) is a 400.
pub async fn create_string(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordView>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    })?;

    let record = analyze(extract_value(&body)?);
    let id = record.id.clone();

    let store = state.store.clone();
    match run_blocking(move || store.insert_if_absent(record)).await? {
        InsertOutcome::Created(stored) => {
            info!(id = %id, "created string");
            Ok((StatusCode::CREATED, Json(stored.into())))
        }
        InsertOutcome::AlreadyExists(_) => {
            debug!(id = %id, "rejected duplicate string");
            Err(ApiError::Conflict("String already exists".to_string()))
        }
    }
}

/// GET /strings
///
/// Lists stored strings matching the structured filter parameters.
pub async fn list_strings(
    State(state): State<AppState>,
    Query(params): Query<StringQueryParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let filters = filters_from_params(&params)?;

    let store = state.store.clone();
    let scan_filters = filters.clone();
    let data: Vec<RecordView> = run_blocking(move || store.scan(&scan_filters))
        .await?
        .into_iter()
        .map(RecordView::from)
        .collect();

    Ok(Json(ListResponse {
        count: data.len(),
        data,
        filters_applied: filters,
    }))
}

/// GET /strings/:value
pub async fn get_string(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<RecordView>, ApiError> {
    let store = state.store.clone();
    run_blocking(move || store.get_by_value(&value))
        .await?
        .map(|stored| Json(stored.into()))
        .ok_or_else(|| ApiError::NotFound("String not found".to_string()))
}

/// DELETE /strings/:value
pub async fn delete_string(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    match run_blocking(move || store.delete_by_value(&value)).await? {
        DeleteOutcome::Deleted => Ok(StatusCode::NO_CONTENT),
        DeleteOutcome::NotFound => Err(ApiError::NotFound("String not found".to_string())),
    }
}
