use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, OwnedSemaphorePermit, Semaphore};
use tower_http::cors::CorsLayer;

use crate::game_loop::{GameBroadcast, GameCommand};
use crate::protocol::{ClientMsg, MAX_MESSAGE_SIZE};
use arena_shared::protocol::ServerMsg;

/// Unparsable frames tolerated before the socket is closed
pub const MAX_PARSE_ERRORS: u32 = 5;

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub game_tx: mpsc::Sender<GameCommand>,
    pub broadcast_tx: broadcast::Sender<GameBroadcast>,
    pub connection_semaphore: Arc<Semaphore>,
    pub next_conn_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        game_tx: mpsc::Sender<GameCommand>,
        broadcast_tx: broadcast::Sender<GameBroadcast>,
        max_connections: usize,
    ) -> Self {
        Self {
            game_tx,
            broadcast_tx,
            connection_semaphore: Arc::new(Semaphore::new(max_connections)),
            next_conn_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_conn_id(&self) -> String {
        format!("conn-{}", self.next_conn_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Router with the `/ws` endpoint
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    let Ok(permit) = app_state.connection_semaphore.clone().try_acquire_owned() else {
        tracing::warn!("Connection refused, server at capacity");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, permit))
}

async fn handle_socket(socket: WebSocket, app_state: AppState, _permit: OwnedSemaphorePermit) {
    let (mut sink, mut stream) = socket.split();
    let my_id = app_state.allocate_conn_id();

    // Subscribe before asking for the snapshot so no event falls in between
    let mut broadcast_rx = app_state.broadcast_tx.subscribe();

    let (resp_tx, resp_rx) = oneshot::channel();
    if app_state
        .game_tx
        .send(GameCommand::Connect {
            conn_id: my_id.clone(),
            response: resp_tx,
        })
        .await
        .is_err()
    {
        tracing::error!("Failed to send Connect command");
        return;
    }

    let welcome = match resp_rx.await {
        Ok(welcome) => welcome,
        Err(_) => {
            tracing::error!("Failed to receive welcome");
            return;
        }
    };

    tracing::info!("Connection {} opened", my_id);

    match serde_json::to_string(&ServerMsg::Welcome(welcome)) {
        Ok(json) => {
            if sink.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        Err(e) => {
            tracing::error!("Failed to encode welcome: {}", e);
            return;
        }
    }

    let mut parse_errors = 0u32;

    loop {
        tokio::select! {
            // Client -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if text.as_str().len() > MAX_MESSAGE_SIZE {
                            tracing::warn!("Connection {} sent {} byte frame, closing", my_id, text.as_str().len());
                            break;
                        }
                        match serde_json::from_str::<ClientMsg>(text.as_str()) {
                            Ok(client_msg) => {
                                let cmd = to_command(&my_id, client_msg);
                                if app_state.game_tx.send(cmd).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                parse_errors += 1;
                                tracing::warn!("Connection {} sent bad frame ({}): {}", my_id, parse_errors, e);
                                if parse_errors >= MAX_PARSE_ERRORS {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Client (broadcast)
            result = broadcast_rx.recv() => {
                match result {
                    Ok(broadcast) => {
                        if !broadcast.recipient.includes(&my_id) {
                            continue; // Not for this client
                        }
                        if let Ok(json) = serde_json::to_string(&broadcast.msg) {
                            if sink.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Connection {} lagged by {} messages", my_id, n);
                        // Continue - the next tick carries a full snapshot
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    let _ = sink.close().await;

    // Cleanup on disconnect
    let _ = app_state
        .game_tx
        .send(GameCommand::Disconnect { conn_id: my_id.clone() })
        .await;
    tracing::info!("Connection {} closed", my_id);
}

fn to_command(conn_id: &str, msg: ClientMsg) -> GameCommand {
    let conn_id = conn_id.to_string();
    match msg {
        ClientMsg::Join { name } => GameCommand::Join { conn_id, name },
        ClientMsg::Move { x, y } => GameCommand::Move { conn_id, x, y },
        ClientMsg::Reset => GameCommand::Reset { conn_id },
    }
}
