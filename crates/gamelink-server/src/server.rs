use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::StreamExt;
use gamelink_core::messages::MessageSet;
use gamelink_session::{Session, SessionConfig};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;

use crate::driver;
use crate::socket;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// How long a peer may stay silent (no pong) before its session ends.
    pub pong_wait: Duration,
    /// Deadline applied to every frame write.
    pub write_wait: Duration,
    pub max_send_queue: usize,
    /// Cadence of the periodic balance request pushed to each peer.
    pub balance_period: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8082,
            pong_wait: Duration::from_secs(60),
            write_wait: Duration::from_secs(10),
            max_send_queue: 256,
            balance_period: Duration::from_secs(3),
        }
    }
}

impl ServerConfig {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            pong_wait: self.pong_wait,
            write_wait: self.write_wait,
            max_send_queue: self.max_send_queue,
        }
    }
}

/// Shared application state passed to axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: ServerConfig,
    messages: Arc<MessageSet>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            messages: Arc::new(MessageSet::standard()),
        }
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve. Returns a handle that keeps the server task alive.
pub async fn start(config: ServerConfig) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState::new(config.clone()));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "gamelink server started");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server,
    })
}

/// Handle returned by `start()`; keeps the server task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Wire one upgraded connection into a session and drive it to completion.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (ws_tx, ws_rx) = socket.split();
    let session = Arc::new(Session::new(
        socket::frame_sink(ws_tx),
        state.config.session_config(),
        Arc::clone(&state.messages),
    ));
    tracing::info!(session_id = %session.id(), "peer connected");

    let (inbound_tx, inbound_rx) = mpsc::channel(state.config.max_send_queue);
    let _ticker = driver::spawn_balance_requests(Arc::clone(&session), state.config.balance_period);
    let _consumer = driver::spawn_inbound_consumer(inbound_rx);

    let error = session.listen(socket::frame_stream(ws_rx), inbound_tx).await;
    tracing::info!(session_id = %session.id(), reason = error.kind(), "peer disconnected");
}

/// Health check HTTP endpoint.
async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "healthy" }))
}
