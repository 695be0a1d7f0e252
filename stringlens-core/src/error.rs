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

//! Error types shared across the Stringlens crates

use thiserror::Error;

/// Result type for Stringlens operations
pub type Result<T> = std::result::Result<T, StringLensError>;

/// Errors surfaced by analysis, query translation and record storage
#[derive(Debug, Error)]
pub enum StringLensError {
    /// Raw value is not a usable string
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record with the same content hash is already stored
    #[error("String already exists: {id}")]
    DuplicateRecord { id: String },

    /// No phrase rule matched the natural-language query
    #[error("Unable to parse natural language query: {query}")]
    UnparseableQuery { query: String },

    /// A numeric capture is not a non-negative integer within range
    #[error("Invalid numeric literal: {literal}")]
    InvalidNumericLiteral { literal: String },

    /// Record not found
    #[error("String not found: {0}")]
    NotFound(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StringLensError {
    fn from(e: serde_json::Error) -> Self {
        StringLensError::Serialization(e.to_string())
    }
}
