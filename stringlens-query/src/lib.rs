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

//! Stringlens Query
//!
//! Heuristic translation of short English queries ("palindromic strings longer
//! than 5 characters") into structured [`FilterSet`](stringlens_core::FilterSet)
//! predicates.

pub mod nl_query_parser;

pub use nl_query_parser::{InterpretedQuery, QueryTranslator};
