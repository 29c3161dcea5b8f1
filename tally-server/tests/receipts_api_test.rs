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

// End-to-end router tests: submit a receipt, score it, and exercise the
// error paths of both endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use tally_core::{Item, Receipt};
use tally_server::api::receipts::{PointsResponse, ProcessResponse};
use tally_server::{api::AppState, router};

fn target_receipt() -> Receipt {
    Receipt {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        items: vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
        total: "35.35".to_string(),
    }
}

fn item(description: &str, price: &str) -> Item {
    Item {
        short_description: description.to_string(),
        price: price.to_string(),
    }
}

fn post_receipt(receipt: &Receipt) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/receipts/process")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(receipt).unwrap()))
        .unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn process_receipt_returns_uuid_and_stores_it() {
    let state = AppState::new();
    let app = router(state.clone());

    let response = app.oneshot(post_receipt(&target_receipt())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ProcessResponse = json_body(response).await;
    assert!(Uuid::parse_str(&body.id).is_ok());
    assert_eq!(state.store.get(&body.id).unwrap().retailer, "Target");
}

#[tokio::test]
async fn submit_then_score_flow() {
    let state = AppState::new();

    let response = router(state.clone())
        .oneshot(post_receipt(&target_receipt()))
        .await
        .unwrap();
    let submitted: ProcessResponse = json_body(response).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .uri(format!("/receipts/{}/points", submitted.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: PointsResponse = json_body(response).await;
    assert_eq!(body.points, 28);
}

#[tokio::test]
async fn points_for_preseeded_receipt() {
    let state = AppState::new();
    let id = Uuid::new_v4().to_string();
    state.store.save(
        id.clone(),
        Receipt {
            retailer: "M&M Corner Market".to_string(),
            purchase_date: "2022-03-20".to_string(),
            purchase_time: "14:33".to_string(),
            items: vec![
                item("Gatorade", "2.25"),
                item("Gatorade", "2.25"),
                item("Gatorade", "2.25"),
                item("Gatorade", "2.25"),
            ],
            total: "9.00".to_string(),
        },
    );

    let response = router(state)
        .oneshot(
            Request::builder()
                .uri(format!("/receipts/{}/points", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: PointsResponse = json_body(response).await;
    assert_eq!(body.points, 109);
}

#[tokio::test]
async fn unknown_id_returns_not_found() {
    let response = router(AppState::new())
        .oneshot(
            Request::builder()
                .uri("/receipts/non-existent-id/points")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submission_without_json_content_type_is_rejected() {
    let response = router(AppState::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/receipts/process")
                .header("Content-Type", "text/plain")
                .body(Body::from(
                    serde_json::to_string(&target_receipt()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn json_content_type_with_charset_is_accepted() {
    let response = router(AppState::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/receipts/process")
                .header("Content-Type", "application/json; charset=utf-8")
                .body(Body::from(
                    serde_json::to_string(&target_receipt()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_body_returns_bad_request() {
    let response = router(AppState::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/receipts/process")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"retailer\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_check_reports_ok() {
    let response = router(AppState::new())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(response).await;
    assert_eq!(body["status"], "ok");
}
