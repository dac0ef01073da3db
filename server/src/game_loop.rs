use crate::config::ServerConfig;
use crate::events::Recipient;
use crate::physics::TickOutcome;
use crate::protocol::{WelcomeMsg, PROTOCOL_VERSION};
use crate::session::SessionManager;
use arena_shared::protocol::ServerMsg;
use arena_shared::vec2::vec2;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Commands from client connections to the game loop
pub enum GameCommand {
    /// A socket opened; answer with the welcome snapshot
    Connect {
        conn_id: String,
        response: oneshot::Sender<WelcomeMsg>,
    },
    Join {
        conn_id: String,
        name: String,
    },
    Move {
        conn_id: String,
        x: f64,
        y: f64,
    },
    Reset {
        conn_id: String,
    },
    /// Connection lost
    Disconnect {
        conn_id: String,
    },
}

/// Broadcasts from game loop to client sockets. Each socket drops the ones
/// not addressed to it.
#[derive(Debug, Clone)]
pub struct GameBroadcast {
    pub recipient: Recipient,
    pub msg: ServerMsg,
}

/// Run the main game loop. Owns the session, so every mutation happens here.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    config: ServerConfig,
) {
    let mut session = SessionManager::new(config.field, config.winning_score);

    let tick_duration = Duration::from_secs_f64(1.0 / config.tick_rate_hz as f64);
    let mut tick_interval = tokio::time::interval(tick_duration);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                match session.tick() {
                    TickOutcome::Goal { scorer } => tracing::debug!("Goal for {:?}", scorer),
                    TickOutcome::GameOver { winner } => tracing::info!("Game over, winner {}", winner),
                    _ => {}
                }
            }

            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => handle_command(&mut session, cmd),
                // Every sender dropped
                None => break,
            },
        }

        flush(&mut session, &broadcast_tx);
    }

    tracing::info!("Game loop ended");
}

/// Apply one inbound command to the session.
pub fn handle_command(session: &mut SessionManager, cmd: GameCommand) {
    match cmd {
        GameCommand::Connect { conn_id, response } => {
            let welcome = WelcomeMsg {
                protocol_version: PROTOCOL_VERSION,
                server_version: env!("CARGO_PKG_VERSION").to_string(),
                self_id: conn_id,
                field: *session.field(),
                state: session.state().into(),
            };
            let _ = response.send(welcome);
        }
        GameCommand::Join { conn_id, name } => {
            if let Err(e) = session.join(&conn_id, &name) {
                tracing::info!("Join from {} refused: {}", conn_id, e);
            }
        }
        GameCommand::Move { conn_id, x, y } => {
            session.move_player(&conn_id, vec2(x, y));
        }
        GameCommand::Reset { conn_id } => {
            // Only seated players may reset the match
            if session.state().players.contains_key(&conn_id) {
                session.reset();
            } else {
                tracing::debug!("Reset from non-player {} ignored", conn_id);
            }
        }
        GameCommand::Disconnect { conn_id } => {
            session.disconnect(&conn_id);
        }
    }
}

fn flush(session: &mut SessionManager, broadcast_tx: &broadcast::Sender<GameBroadcast>) {
    for outbound in session.drain_events() {
        // No subscribers is fine; events for an empty room are dropped
        let _ = broadcast_tx.send(GameBroadcast {
            recipient: outbound.recipient,
            msg: ServerMsg::from(&outbound.event),
        });
    }
}
