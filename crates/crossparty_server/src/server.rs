//! WebSocket transport.
//!
//! One task per connection. The socket is split: a writer task drains the
//! player's outbox, the reader loop feeds frames to the router in arrival
//! order. When the reader stops the player is disconnected from the lobby.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ServerConfig;
use crate::error::{ConfigError, ServerError};
use crate::lobby::Hub;
use crate::protocol::{self, ServerMessage};
use crate::router::SessionRouter;

/// Builds the axum application serving the game at `/`.
pub fn app(hub: Hub) -> Router {
    Router::new().route("/", get(ws_handler)).with_state(hub)
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<Hub>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Hub) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let player = hub.connect(tx);
    info!(player_id = %player, "WebSocket connection established");

    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match protocol::encode(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!(player_id = %player, error = %e, "Failed to encode message");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let router = SessionRouter::new(hub.clone());
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => router.dispatch(player, text.as_str()),
            Ok(Message::Binary(bytes)) => router.dispatch_binary(player, &bytes),
            Ok(Message::Close(_)) => {
                debug!(player_id = %player, "WebSocket closed by client");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(player_id = %player, error = %e, "WebSocket error");
                break;
            }
        }
    }

    hub.disconnect(player);
    writer.abort();
    info!(player_id = %player, "WebSocket connection terminated");
}

/// Serves `hub` on an already bound listener until Ctrl+C.
///
/// # Errors
///
/// Returns [`ServerError`] if the accept loop fails.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, hub: Hub) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Listening for players");
    }
    axum::serve(listener, app(hub))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Binds according to `config` and serves until shut down.
///
/// # Errors
///
/// Returns [`ServerError`] for invalid configuration, bind failure or a
/// failing accept loop.
#[instrument(skip(config), fields(addr = %config.bind_address()))]
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    config
        .validate()
        .map_err(|e: ConfigError| ServerError::new(e.to_string()))?;
    let listener = TcpListener::bind(config.bind_address())
        .await
        .map_err(|e| ServerError::new(format!("Failed to bind {}: {}", config.bind_address(), e)))?;
    serve(listener, Hub::new(*config.board_size())).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
