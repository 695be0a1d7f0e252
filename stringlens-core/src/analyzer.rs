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

//! String analyzer
//!
//! Turns raw text into an [`AnalyzedRecord`]. The function is pure and total:
//! no I/O, no shared state, safe to call from any number of threads.
//!
//! Canonicalization strips leading and trailing whitespace; every property is
//! computed from the canonical value, never from the raw input. An input that is
//! empty after stripping analyzes to length 0, word count 0, no characters and
//! `is_palindrome = true`.

use crate::record::AnalyzedRecord;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

/// Canonical form of a raw value (leading/trailing whitespace removed)
pub fn canonicalize(raw: &str) -> &str {
    raw.trim()
}

/// Lowercase hex SHA-256 of the value's UTF-8 bytes
pub fn content_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Analyze a raw string
pub fn analyze(raw: &str) -> AnalyzedRecord {
    let value = canonicalize(raw);

    let mut character_frequency_map: BTreeMap<char, usize> = BTreeMap::new();
    for c in value.chars() {
        *character_frequency_map.entry(c).or_insert(0) += 1;
    }

    AnalyzedRecord {
        id: content_hash(value),
        value: value.to_string(),
        length: value.chars().count(),
        is_palindrome: is_palindrome(value),
        unique_characters: value.chars().collect::<HashSet<_>>().len(),
        word_count: value.split_whitespace().count(),
        character_frequency_map,
    }
}

/// Reverse first, then case-fold both sides.
fn is_palindrome(value: &str) -> bool {
    let reversed: String = value.chars().rev().collect();
    value.to_lowercase() == reversed.to_lowercase()
}
