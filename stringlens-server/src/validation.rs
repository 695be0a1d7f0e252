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

//! Input validation for API requests
//!
//! Everything here runs before the analyzer or the query translator is called.

use crate::api::ApiError;
use serde::Deserialize;
use stringlens_core::FilterSet;

/// Structured filter query parameters for `GET /strings`
///
/// Values stay raw strings here; [`filters_from_params`] parses them.
#[derive(Debug, Default, Deserialize)]
pub struct StringQueryParams {
    pub is_palindrome: Option<String>,
    pub min_length: Option<String>,
    pub max_length: Option<String>,
    pub word_count: Option<String>,
    pub contains_character: Option<String>,
}

/// Extract the `value` field of a create request
///
/// Missing or null is a bad request; any other non-string JSON type is
/// unprocessable.
pub fn extract_value(body: &serde_json::Value) -> Result<&str, ApiError> {
    match body.get("value") {
        None | Some(serde_json::Value::Null) => {
            Err(ApiError::BadRequest("Missing 'value' field".to_string()))
        }
        Some(serde_json::Value::String(value)) => Ok(value),
        Some(_) => Err(ApiError::UnprocessableEntity(
            "'value' must be a string".to_string(),
        )),
    }
}

/// Build a filter set from structured query parameters
///
/// Empty parameter values count as absent.
pub fn filters_from_params(params: &StringQueryParams) -> Result<FilterSet, ApiError> {
    let mut filters = FilterSet::new();

    if let Some(raw) = non_empty(&params.is_palindrome) {
        filters.is_palindrome = Some(match raw.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => return Err(invalid_param("is_palindrome", raw)),
        });
    }

    if let Some(raw) = non_empty(&params.min_length) {
        filters.min_length = Some(parse_integer("min_length", raw)?);
    }

    if let Some(raw) = non_empty(&params.max_length) {
        filters.max_length = Some(parse_integer("max_length", raw)?);
    }

    if let Some(raw) = non_empty(&params.word_count) {
        filters.word_count = Some(parse_integer("word_count", raw)?);
    }

    if let Some(raw) = non_empty(&params.contains_character) {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => filters.contains_character = Some(c),
            _ => return Err(invalid_param("contains_character", raw)),
        }
    }

    Ok(filters)
}

/// Validate the `query` parameter of a natural-language search
pub fn validate_nl_query(query: Option<&str>, max_length: usize) -> Result<&str, ApiError> {
    let query = match query {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(ApiError::BadRequest("Missing query parameter".to_string())),
    };

    let length = query.len();
    if length > max_length {
        let message = format!("Query too long: {} bytes (max {})", length, max_length);
        return Err(ApiError::BadRequest(message));
    }

    Ok(query)
}

fn non_empty(param: &Option<String>) -> Option<&str> {
    param.as_deref().filter(|v| !v.is_empty())
}

fn parse_integer(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| invalid_param(name, raw))
}

fn invalid_param(name: &str, raw: &str) -> ApiError {
    let message = format!("Invalid query parameter value: {}={}", name, raw);
    ApiError::BadRequest(message)
}
