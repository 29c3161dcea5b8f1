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

//! Points rule engine.
//!
//! A receipt's score is the sum of six independent rules. Every rule is total
//! over its input: a field that fails to parse contributes zero points instead
//! of surfacing an error, so [`score`] never fails. Rules never mutate the
//! receipt and share no state, which also makes scoring deterministic.
//!
//! The evaluation order below is fixed only so per-rule debug logs line up
//! across runs; summation is commutative.

use crate::receipt::Receipt;
use chrono::{Datelike, Timelike};
use tracing::debug;

type Rule = fn(&Receipt) -> u64;

const RULES: &[(&str, Rule)] = &[
    ("retailer_alphanumeric", retailer_alphanumeric),
    ("total_round_dollar", total_round_dollar),
    ("total_quarter_multiple", total_quarter_multiple),
    ("item_pairs", item_pairs),
    ("item_description_length", item_description_length),
    ("purchase_time", purchase_time),
];

/// Compute the loyalty points awarded to a receipt.
///
/// Always succeeds; malformed numeric or date fields degrade to a zero
/// contribution in the rule that reads them.
pub fn score(receipt: &Receipt) -> u64 {
    let mut total = 0;
    for (name, rule) in RULES {
        let points = rule(receipt);
        debug!(rule = name, points, "rule contribution");
        total += points;
    }
    total
}

/// One point per Unicode letter or digit in the retailer name.
fn retailer_alphanumeric(receipt: &Receipt) -> u64 {
    receipt
        .retailer
        .chars()
        .filter(|c| c.is_alphanumeric())
        .count() as u64
}

/// 50 points if the total is a round dollar amount with no cents.
fn total_round_dollar(receipt: &Receipt) -> u64 {
    match receipt.total.parse::<f64>() {
        Ok(total) if total.trunc() == total => 50,
        _ => 0,
    }
}

/// 25 points if the total is a multiple of 0.25.
///
/// The modulo is exact f64 arithmetic with no tolerance. Decimal quarter
/// multiples that are not exactly representable in binary can be
/// misclassified; that behavior is part of the scoring contract.
fn total_quarter_multiple(receipt: &Receipt) -> u64 {
    match receipt.total.parse::<f64>() {
        Ok(total) if total % 0.25 == 0.0 => 25,
        _ => 0,
    }
}

/// 5 points for every two items on the receipt.
fn item_pairs(receipt: &Receipt) -> u64 {
    (receipt.items.len() / 2) as u64 * 5
}

/// For each item whose trimmed description length is a multiple of 3, award
/// the price times 0.2, rounded up.
///
/// Length is counted in Unicode code points. A trimmed length of 0 satisfies
/// the modulo test and is awarded like any other multiple of 3. An item whose
/// price does not parse contributes nothing; the remaining items still count.
fn item_description_length(receipt: &Receipt) -> u64 {
    let mut points = 0;
    for item in &receipt.items {
        let len = item.short_description.trim().chars().count();
        if len % 3 != 0 {
            continue;
        }
        if let Ok(price) = item.price.parse::<f64>() {
            points += (price * 0.2).ceil() as u64;
        }
    }
    points
}

/// 6 points if the purchase day of month is odd, plus 10 points if the
/// purchase hour is between 14:00 and 16:59 inclusive.
///
/// The hour test is `14 <= hour <= 16`, so 16:00 and later within that hour
/// still qualify even though the rule is often described as "before 4pm".
fn purchase_time(receipt: &Receipt) -> u64 {
    let Some(purchased_at) = receipt.purchased_at() else {
        return 0;
    };

    let mut points = 0;
    if purchased_at.day() % 2 == 1 {
        points += 6;
    }
    if (14..=16).contains(&purchased_at.hour()) {
        points += 10;
    }
    points
}
