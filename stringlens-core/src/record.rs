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

//! Analyzed record data model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of analyzing a string, keyed by its content hash.
///
/// Records are produced once by [`crate::analyze`] and never mutated. Every
/// derived field is computed from `value`, the canonical (trimmed) text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedRecord {
    /// Lowercase hex SHA-256 of `value`
    pub id: String,
    /// Canonical text
    pub value: String,
    /// Number of characters in `value`
    pub length: usize,
    /// Case-insensitive palindrome flag
    pub is_palindrome: bool,
    /// Number of distinct characters (case-sensitive)
    pub unique_characters: usize,
    /// Number of whitespace-delimited tokens
    pub word_count: usize,
    /// Occurrences of each character (case-sensitive, interior whitespace included)
    pub character_frequency_map: BTreeMap<char, usize>,
}

impl AnalyzedRecord {
    /// Property view used by the HTTP layer
    pub fn properties(&self) -> StringProperties {
        StringProperties {
            length: self.length,
            is_palindrome: self.is_palindrome,
            unique_characters: self.unique_characters,
            word_count: self.word_count,
            sha256_hash: self.id.clone(),
            character_frequency_map: self.character_frequency_map.clone(),
        }
    }

    /// Whether `c` occurs at least once in the value
    pub fn contains_char(&self, c: char) -> bool {
        self.character_frequency_map
            .get(&c)
            .is_some_and(|count| *count > 0)
    }
}

/// Derived properties of a record, as returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringProperties {
    pub length: usize,
    pub is_palindrome: bool,
    pub unique_characters: usize,
    pub word_count: usize,
    pub sha256_hash: String,
    pub character_frequency_map: BTreeMap<char, usize>,
}
