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

//! Stringlens Server
//!
//! HTTP service that analyzes submitted strings, stores the results and
//! answers structured and natural-language filter queries over them.

pub mod api;
pub mod config;
pub mod validation;

use anyhow::Result;
use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use stringlens_storage::{InMemoryRecordStore, RecordStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{
    create_string, delete_string, filter_by_natural_language, get_string, health_check,
    list_strings, AppState,
};
use config::ServerConfig;

const DEFAULT_LOG_FILTER: &str = "stringlens_server=info,stringlens_storage=info,tower_http=info";

/// Routes without transport layers (CORS, tracing)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/strings", get(list_strings).post(create_string))
        .route(
            "/strings/filter-by-natural-language",
            get(filter_by_natural_language),
        )
        .route("/strings/:value", get(get_string).delete(delete_string))
        .with_state(state)
}

/// Open the record store described by the storage configuration
pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn RecordStore>> {
    if config.storage.persist {
        tracing::info!("Opening record store at: {:?}", config.storage.data_dir);
        let store = InMemoryRecordStore::open(&config.storage.data_dir)?;
        Ok(Arc::new(store))
    } else {
        tracing::info!("Using volatile in-memory record store");
        Ok(Arc::new(InMemoryRecordStore::new()))
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if !config.server.enable_cors {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.server.cors_origins.is_empty() {
        tracing::warn!("CORS: Allowing all origins. Set cors_origins to restrict them.");
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("CORS: Ignoring invalid origin {:?}: {}", origin, e);
                    None
                }
            })
            .collect();
        tracing::info!("CORS: Allowing origins: {:?}", config.server.cors_origins);
        cors.allow_origin(origins)
    }
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stringlens Server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;

    let store = open_store(&config)?;
    tracing::info!("Record store holds {} strings", store.len());

    let state = AppState::new(store, config.server.max_query_length);
    let app = build_router(state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
