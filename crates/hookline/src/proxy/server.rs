//! HTTP proxy service in front of the workflow webhook
//!
//! Routes:
//! - `POST /api/chat` forwards a chat envelope through the [`ProxyGateway`]
//! - `POST /api/test` echoes the request body back
//! - `GET /health` reports that the service is up

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::chat::SessionId;
use crate::config::ProxyConfig;
use crate::error::{HooklineError, Result};
use crate::gateway::{ChatEnvelope, ProxyError, ProxyGateway};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Proxy configuration
    pub config: ProxyConfig,
    /// Outbound gateway to the webhook
    pub gateway: ProxyGateway,
}

/// The proxy service
pub struct ProxyServer {
    config: ProxyConfig,
    gateway: ProxyGateway,
}

impl ProxyServer {
    pub fn new(config: ProxyConfig, gateway: ProxyGateway) -> Self {
        Self { config, gateway }
    }

    /// Bind the listen address and serve until Ctrl+C or SIGTERM
    pub async fn serve(&self) -> Result<()> {
        let app_state = Arc::new(AppState {
            config: self.config.clone(),
            gateway: self.gateway.clone(),
        });

        let app = create_router(app_state);

        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .map_err(|e| HooklineError::Config(format!("Invalid listen address: {e}")))?;

        tracing::info!("Starting proxy server on {addr}");
        tracing::info!("Forwarding chat messages to {}", self.config.webhook_url);
        if self.config.probe_enabled {
            tracing::info!(
                "Reachability probe enabled ({}s timeout)",
                self.config.probe_timeout_secs
            );
        } else {
            tracing::info!("Reachability probe disabled");
        }

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HooklineError::Proxy(format!("Failed to bind to {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| HooklineError::Proxy(format!("Server error: {e}")))?;

        tracing::info!("Proxy server shut down gracefully");
        Ok(())
    }
}

/// Create the router with all routes and layers configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/test", post(test_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "hookline",
        "listen_addr": state.config.listen_addr,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Forward one chat envelope to the webhook and relay the reply
async fn chat_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let envelope: ChatEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Rejected malformed chat envelope: {e}");
            return ProxyError::Config(format!("Invalid chat envelope: {e}")).into_response();
        }
    };

    if let Err(e) = SessionId::try_from(envelope.session_id.as_str()) {
        tracing::warn!("Rejected chat envelope with invalid session ID: {e}");
        return ProxyError::Config(format!("Invalid session ID: {e}")).into_response();
    }

    let span = tracing::info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        session_id = %envelope.session_id,
    );

    async move {
        tracing::info!(chars = envelope.message.chars().count(), "Forwarding chat message");
        match state.gateway.forward(&envelope).await {
            Ok(payload) => {
                tracing::info!("Reply relayed");
                Json(payload.into_value()).into_response()
            }
            Err(e) => {
                tracing::error!(kind = %e.kind(), "{e}");
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Echo endpoint for checking that the proxy itself is reachable
async fn test_handler(body: Bytes) -> Json<Value> {
    let received = serde_json::from_slice::<Value>(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

    Json(json!({
        "status": "Backend is working!",
        "received": received,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
