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

//! Structured record filters
//!
//! A [`FilterSet`] is produced either by the natural-language translator or
//! directly from structured query parameters. A record matches when it
//! satisfies every field that is set; unset fields impose no constraint.

use crate::record::AnalyzedRecord;
use serde::{Deserialize, Serialize};

/// Optional-field predicate bundle used to scan stored records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Exact palindrome flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,

    /// Inclusive lower bound on length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,

    /// Inclusive upper bound on length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,

    /// Exact word count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<i64>,

    /// Character that must occur at least once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<char>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.is_palindrome.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.word_count.is_none()
            && self.contains_character.is_none()
    }

    pub fn with_palindrome(mut self, is_palindrome: bool) -> Self {
        self.is_palindrome = Some(is_palindrome);
        self
    }

    pub fn with_min_length(mut self, min_length: i64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets both bounds to `length`
    pub fn with_exact_length(self, length: i64) -> Self {
        self.with_min_length(length).with_max_length(length)
    }

    pub fn with_word_count(mut self, word_count: i64) -> Self {
        self.word_count = Some(word_count);
        self
    }

    pub fn with_contains_character(mut self, c: char) -> Self {
        self.contains_character = Some(c);
        self
    }

    /// Conjunction of every set field against `record`
    pub fn matches(&self, record: &AnalyzedRecord) -> bool {
        let length = record.length as i64;

        if let Some(is_palindrome) = self.is_palindrome {
            if record.is_palindrome != is_palindrome {
                return false;
            }
        }

        if let Some(min_length) = self.min_length {
            if length < min_length {
                return false;
            }
        }

        if let Some(max_length) = self.max_length {
            if length > max_length {
                return false;
            }
        }

        if let Some(word_count) = self.word_count {
            if record.word_count as i64 != word_count {
                return false;
            }
        }

        if let Some(c) = self.contains_character {
            if !record.contains_char(c) {
                return false;
            }
        }

        true
    }
}
