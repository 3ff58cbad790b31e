//! API router configuration.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_info, cancel_all_wars, cancel_war, health, list_wars, post_message, start_war, AppState,
};
use super::websocket::ws_room_handler;
use crate::error::WarError;
use crate::security::{auth_middleware, ApiKeyStore, AuthConfig};

/// Create the API router with default state.
pub fn create_router() -> Router {
    create_router_with_state(AppState::default())
}

/// Create the API router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    let war_routes = Router::new()
        .route("/", get(list_wars).post(start_war).delete(cancel_all_wars))
        .route("/{room}", delete(cancel_war));

    let api_v1 = Router::new()
        .route("/", get(api_info))
        .route("/messages", post(post_message))
        .route("/rooms/{room}/ws", any(ws_room_handler))
        .nest("/wars", war_routes);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_v1)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.auth),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Stop on Ctrl-C after in-flight requests finish.
    pub graceful_shutdown: bool,
    pub auth: AuthConfig,
    pub api_keys: Vec<String>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_keys.push(key.into());
        self
    }

    pub fn without_graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = false;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Key store for this configuration.
    pub fn key_store(&self) -> ApiKeyStore {
        ApiKeyStore::with_keys(self.auth.clone(), self.api_keys.iter().cloned())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown: true,
            auth: AuthConfig::disabled(),
            api_keys: Vec::new(),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Start the API server with default state.
pub async fn serve(config: ServerConfig) -> crate::Result<()> {
    let state = AppState::default().with_auth(config.key_store());
    serve_with_state(config, state).await
}

/// Start the API server with custom state.
///
/// The auth settings in `config` are not applied here; build the state with
/// [`AppState::with_auth`] first.
pub async fn serve_with_state(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Starting wordwar API server on {}", addr);

    let server = axum::serve(listener, router);
    let result = if config.graceful_shutdown {
        server.with_graceful_shutdown(shutdown_signal()).await
    } else {
        server.await
    };

    result.map_err(|e| WarError::Io(std::io::Error::other(e.to_string())))
}
