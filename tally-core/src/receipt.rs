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

//! Receipt wire types.
//!
//! Field names follow the JSON wire format exactly (camelCase). Money values
//! and date/time fields stay as text here; the rule engine parses them lazily
//! and degrades to zero points when they do not parse. A receipt is immutable
//! once decoded.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A submitted purchase receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub retailer: String,

    /// Calendar date of purchase, `YYYY-MM-DD`.
    #[serde(rename = "purchaseDate")]
    pub purchase_date: String,

    /// Time of purchase, 24-hour `HH:MM`.
    #[serde(rename = "purchaseTime")]
    pub purchase_time: String,

    pub items: Vec<Item>,

    /// Total amount as a decimal string, e.g. `"35.35"`.
    pub total: String,
}

/// One line entry on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "shortDescription")]
    pub short_description: String,

    /// Unit price as a decimal string.
    pub price: String,
}

impl Receipt {
    /// Combine purchase date and time into a single datetime.
    ///
    /// Returns `None` when either field does not match the wire format;
    /// callers treat that as "no time-based points" rather than an error.
    pub fn purchased_at(&self) -> Option<NaiveDateTime> {
        let combined = format!("{} {}", self.purchase_date, self.purchase_time);
        NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M").ok()
    }
}
