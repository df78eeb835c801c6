//! API Server for the task tracker
//!
//! Serves the task REST API over HTTP. Configuration comes from the
//! environment (see `config.rs`); a `.env` file is loaded when present.

mod config;
mod routes;
mod state;

use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ServerConfig, StoreBackend};
use crate::state::AppState;

fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::task::router())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tasktrack_api=debug,tower_http=debug,tasktrack_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    match config.store {
        StoreBackend::Sqlite => tracing::info!("Using SQLite store at {}", config.database_url),
        StoreBackend::Memory => tracing::warn!("Using in-memory store; tasks are lost on exit"),
    }

    let state = AppState::new(&config)
        .await
        .context("Failed to initialize task store")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("REST API listening on {}", config.bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tasktrack_core::task::InMemoryTaskStore;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn app_serves_merged_routes_with_cors() {
        let state =
            AppState::with_repository(Arc::new(InMemoryTaskStore::new()), StoreBackend::Memory);
        let app = app(state);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/tasks")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn app_state_from_in_memory_sqlite_config() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            store: StoreBackend::Sqlite,
            database_url: "sqlite::memory:".to_string(),
            max_connections: 3,
        };
        let state = AppState::new(&config).await.unwrap();
        assert_eq!(state.store(), StoreBackend::Sqlite);
        assert!(state.task_service().list().await.unwrap().is_empty());
    }
}
