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

pub mod health;
pub mod receipts;

use std::sync::Arc;
use tally_store::ReceiptStore;

pub use health::health_check;
pub use receipts::{get_receipt_points, process_receipt};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReceiptStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(ReceiptStore::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
