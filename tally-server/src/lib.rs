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

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;

use anyhow::Result;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{get_receipt_points, health_check, process_receipt, AppState};
use config::ServerConfig;

/// Build the application router.
///
/// The submission route is gated by the JSON content-type middleware; the
/// score and health routes accept bare GETs.
pub fn router(state: AppState) -> Router {
    let submit = Router::new()
        .route("/receipts/process", post(process_receipt))
        .layer(axum_middleware::from_fn(middleware::require_json));

    Router::new()
        .route("/health", get(health_check))
        .route("/receipts/:id/points", get(get_receipt_points))
        .merge(submit)
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tally server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;

    let state = AppState::new();

    let app = router(state)
        .layer(if config.server.enable_cors {
            let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

            if config.server.cors_origins.is_empty() {
                tracing::warn!(
                    "CORS: Allowing all origins (development mode). Set cors_origins in production!"
                );
            } else {
                tracing::info!("CORS: Allowing origins: {:?}", config.server.cors_origins);
            }
            cors.allow_origin(Any)
        } else {
            CorsLayer::new()
        })
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives an interrupt, so in-flight requests can
/// drain before the listener closes.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
