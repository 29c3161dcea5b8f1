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

//! In-memory receipt store.
//!
//! Bridges submission and later scoring: the server writes a receipt under a
//! freshly generated id and reads it back when points are requested. Receipts
//! live for the lifetime of the process; there is no eviction, expiry, or
//! delete operation.
//!
//! ## Consistency contract
//!
//! Last-writer-wins per key. Once a [`ReceiptStore::save`] call has returned,
//! any subsequently issued [`ReceiptStore::get`] for that key observes the new
//! value. Ordering between a save and a get racing on the same key from
//! different threads is the caller's responsibility. Sharding inside
//! [`DashMap`] keeps a get on one key from blocking behind a save on another,
//! and a reader never observes a partially written receipt.

use dashmap::DashMap;
use tally_core::Receipt;
use tracing::debug;

/// Concurrent map from receipt id to receipt.
///
/// Keys are opaque to the store; the server uses UUID strings. The value type
/// is a concrete [`Receipt`] rather than an erased payload, so a stored value
/// cannot fail to reinterpret on the way out.
#[derive(Debug, Default)]
pub struct ReceiptStore {
    receipts: DashMap<String, Receipt>,
}

impl ReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the receipt stored under `key`.
    pub fn save(&self, key: impl Into<String>, receipt: Receipt) {
        let key = key.into();
        debug!(key = %key, "storing receipt");
        self.receipts.insert(key, receipt);
    }

    /// Look up the receipt stored under `key`, or `None` if it was never
    /// written.
    pub fn get(&self, key: &str) -> Option<Receipt> {
        self.receipts.get(key).map(|entry| entry.value().clone())
    }

    /// Number of stored receipts.
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tally_core::Item;

    fn sample_receipt(retailer: &str) -> Receipt {
        Receipt {
            retailer: retailer.to_string(),
            purchase_date: "2022-01-01".to_string(),
            purchase_time: "13:01".to_string(),
            items: vec![Item {
                short_description: "Gatorade".to_string(),
                price: "2.25".to_string(),
            }],
            total: "2.25".to_string(),
        }
    }

    #[test]
    fn save_then_get_round_trips() {
        let store = ReceiptStore::new();
        store.save("id-1", sample_receipt("Target"));

        let loaded = store.get("id-1").unwrap();
        assert_eq!(loaded.retailer, "Target");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_on_unwritten_key_misses() {
        let store = ReceiptStore::new();
        assert!(store.get("never-written").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn save_overwrites_existing_key() {
        let store = ReceiptStore::new();
        store.save("id-1", sample_receipt("Target"));
        store.save("id-1", sample_receipt("Walgreens"));

        assert_eq!(store.get("id-1").unwrap().retailer, "Walgreens");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_saves_and_gets_do_not_corrupt() {
        let store = Arc::new(ReceiptStore::new());
        let mut handles = Vec::new();

        for writer in 0..4 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..250 {
                    let key = format!("w{}-{}", writer, i);
                    store.save(key.clone(), sample_receipt("Target"));
                    // Issued-after-save read on the same key must hit.
                    assert_eq!(store.get(&key).unwrap().retailer, "Target");
                }
            }));
        }

        for reader in 0..4 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..250 {
                    // Any value observed must be fully written.
                    if let Some(receipt) = store.get(&format!("w{}-{}", reader, i)) {
                        assert_eq!(receipt.retailer, "Target");
                        assert_eq!(receipt.items.len(), 1);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 1000);
    }
}
