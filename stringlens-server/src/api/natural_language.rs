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
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use stringlens_query::InterpretedQuery;
use tracing::debug;

use crate::api::{run_blocking, ApiError, AppState, RecordView};
use crate::validation::validate_nl_query;

#[derive(Debug, Deserialize)]
pub struct NaturalLanguageParams {
    pub query: Option<String>,
}

/// Response body for `GET /strings/filter-by-natural-language`
#[derive(Debug, Serialize)]
pub struct NaturalLanguageResponse {
    pub data: Vec<RecordView>,
    pub count: usize,
    pub interpreted_query: InterpretedQuery,
}

/// GET /strings/filter-by-natural-language?query=...
///
/// Translates the query into filters, then scans the store with them.
pub async fn filter_by_natural_language(
    State(state): State<AppState>,
    Query(params): Query<NaturalLanguageParams>,
) -> Result<Json<NaturalLanguageResponse>, ApiError> {
    let query = validate_nl_query(params.query.as_deref(), state.max_query_length)?;

    let interpreted = state.translator.translate(query).map_err(|e| {
        debug!("Rejected natural language query {:?}: {}", query, e);
        ApiError::from(e)
    })?;

    let store = state.store.clone();
    let filters = interpreted.parsed_filters.clone();
    let data: Vec<RecordView> = run_blocking(move || store.scan(&filters))
        .await?
        .into_iter()
        .map(RecordView::from)
        .collect();

    Ok(Json(NaturalLanguageResponse {
        count: data.len(),
        data,
        interpreted_query: interpreted,
    }))
}
