// Copyright 2025 Tally (https://github.com/tally-labs/tally)
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

//! Core data model and points rule engine for Tally.
//!
//! This crate is pure computation: no I/O, no shared state. The server crate
//! decodes receipts off the wire and hands them here for scoring.

pub mod receipt;
pub mod rules;

pub use receipt::{Item, Receipt};
pub use rules::score;
