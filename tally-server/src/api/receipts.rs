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

//! Receipt submission and scoring endpoints.
//!
//! `POST /receipts/process` decodes a receipt, assigns it a fresh UUID and
//! stores it. `GET /receipts/:id/points` looks the receipt back up and runs
//! the rule engine over it. Receipt field contents are not validated here;
//! the rule engine is total over malformed fields.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::ApiError;
use tally_core::Receipt;

/// Response for POST /receipts/process
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub id: String,
}

/// Response for GET /receipts/:id/points
#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u64,
}

/// POST /receipts/process - store a submitted receipt under a fresh id
#[tracing::instrument(skip_all)]
pub async fn process_receipt(
    State(state): State<AppState>,
    payload: Result<Json<Receipt>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let Json(receipt) = payload.map_err(|rejection| {
        debug!("rejecting receipt payload: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    })?;

    let id = Uuid::new_v4().to_string();
    state.store.save(id.clone(), receipt);
    debug!(id = %id, "receipt stored");

    Ok(Json(ProcessResponse { id }))
}

/// GET /receipts/:id/points - score a previously stored receipt
#[tracing::instrument(skip(state))]
pub async fn get_receipt_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ApiError> {
    let receipt = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("no receipt with id {}", id)))?;

    let points = tally_core::score(&receipt);
    debug!(id = %id, points, "scored receipt");

    Ok(Json(PointsResponse { points }))
}
