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

//! Natural Language Query Translator
//!
//! Maps a handful of English phrasings onto [`FilterSet`] fields using a fixed,
//! ordered table of phrase rules. Every rule is evaluated against the
//! lowercased query; each one that matches sets its field, and a later rule
//! overwrites a field an earlier rule already set. That ordering is what lets
//! an exact length ("length of 5") win over "longer than" / "shorter than".
//!
//! ## Example Queries
//!
//! - "single word palindromic strings"
//! - "strings longer than 10 characters"
//! - "strings shorter than 5 characters"
//! - "strings containing the letter z"
//! - "strings of length 7 containing the letter 'a'"

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use stringlens_core::{FilterSet, Result, StringLensError};
use tracing::trace;

/// Successful translation of a natural-language query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretedQuery {
    /// Query text as submitted
    pub original: String,
    /// Filters derived from the text
    pub parsed_filters: FilterSet,
}

/// One phrase-to-filter mapping
struct PhraseRule {
    name: &'static str,
    /// Alternatives tried in order; the first that matches supplies the captures
    patterns: Vec<Regex>,
    /// Rule is skipped when this pattern matches anywhere in the query
    unless: Option<Regex>,
    apply: fn(&Captures, FilterSet) -> Result<FilterSet>,
}

/// Natural language query translator
pub struct QueryTranslator {
    rules: Vec<PhraseRule>,
}

impl QueryTranslator {
    /// Create a translator with the built-in rule table
    pub fn new() -> Self {
        Self {
            rules: Self::build_rules(),
        }
    }

    fn build_rules() -> Vec<PhraseRule> {
        vec![
            // "single word", "one-word"
            PhraseRule {
                name: "single_word",
                patterns: vec![pattern(r"\b(?:single|one)[- ]word\b")],
                unless: None,
                apply: |_, filters| Ok(filters.with_word_count(1)),
            },
            // "palindrome", "palindromes", "palindromic", "palindromal"
            PhraseRule {
                name: "palindrome",
                patterns: vec![pattern(r"\bpalindrom(?:es?|ic|al)\b")],
                unless: None,
                apply: |_, filters| Ok(filters.with_palindrome(true)),
            },
            // "longer than or equal to N"
            PhraseRule {
                name: "longer_or_equal",
                patterns: vec![pattern(LONGER_OR_EQUAL)],
                unless: None,
                apply: |caps, filters| Ok(filters.with_min_length(numeric_capture(caps)?)),
            },
            // "longer than N"
            PhraseRule {
                name: "longer_than",
                patterns: vec![pattern(r"\blonger than ([0-9]+)")],
                unless: Some(pattern(LONGER_OR_EQUAL)),
                apply: |caps, filters| {
                    let n = numeric_capture(caps)?;
                    let min_length = n.checked_add(1).ok_or_else(|| invalid_literal(caps))?;
                    Ok(filters.with_min_length(min_length))
                },
            },
            // "shorter than N"
            PhraseRule {
                name: "shorter_than",
                patterns: vec![pattern(r"\bshorter than ([0-9]+)")],
                unless: None,
                apply: |caps, filters| Ok(filters.with_max_length(numeric_capture(caps)? - 1)),
            },
            // "length N", "length of N"
            PhraseRule {
                name: "exact_length",
                patterns: vec![pattern(r"\blength (?:of )?([0-9]+)")],
                unless: None,
                apply: |caps, filters| Ok(filters.with_exact_length(numeric_capture(caps)?)),
            },
            // "containing the letter 'a'", "contains letter z", "containing z"
            PhraseRule {
                name: "contains_character",
                patterns: vec![
                    pattern(
                        r#"\bcontain(?:s|ing)?\s+(?:the\s+)?letters?\s+['"]?([a-z0-9])['"]?(?:[^a-z0-9]|$)"#,
                    ),
                    pattern(r#"\bcontain(?:s|ing)?\s+['"]?([a-z0-9])['"]?(?:[^a-z0-9]|$)"#),
                ],
                unless: None,
                apply: |caps, filters| {
                    let c = caps
                        .get(1)
                        .and_then(|m| m.as_str().chars().next())
                        .ok_or_else(|| invalid_literal(caps))?;
                    Ok(filters.with_contains_character(c))
                },
            },
        ]
    }

    /// Translate a natural language query into filters
    ///
    /// Fails with [`StringLensError::UnparseableQuery`] when no rule matches and
    /// with [`StringLensError::InvalidNumericLiteral`] when a matched number does
    /// not fit the filter's integer type.
    pub fn translate(&self, text: &str) -> Result<InterpretedQuery> {
        let normalized = text.trim().to_lowercase();
        let mut filters = FilterSet::new();

        for rule in &self.rules {
            if let Some(unless) = &rule.unless {
                if unless.is_match(&normalized) {
                    continue;
                }
            }

            let Some(caps) = rule.patterns.iter().find_map(|re| re.captures(&normalized)) else {
                continue;
            };

            filters = (rule.apply)(&caps, filters)?;
            trace!(rule = rule.name, "phrase rule matched");
        }

        if filters.is_empty() {
            return Err(StringLensError::UnparseableQuery {
                query: text.to_string(),
            });
        }

        Ok(InterpretedQuery {
            original: text.to_string(),
            parsed_filters: filters,
        })
    }
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new()
    }
}

const LONGER_OR_EQUAL: &str = r"\blonger than or equal to ([0-9]+)";

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("phrase rule pattern must compile")
}

/// First capture group as a non-negative integer
fn numeric_capture(caps: &Captures) -> Result<i64> {
    caps.get(1)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .ok_or_else(|| invalid_literal(caps))
}

fn invalid_literal(caps: &Captures) -> StringLensError {
    StringLensError::InvalidNumericLiteral {
        literal: caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    }
}
