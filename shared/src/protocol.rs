use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{FieldConfig, Side};

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Largest client frame the server accepts, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 1024;

// === Server -> Client ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Welcome(WelcomeMsg),
    PlayerJoined(PlayerWire),
    /// Sent to the joining connection only
    WaitingForOpponent,
    /// Sent to the joining connection only
    GameFull,
    GameStarted(GameStateWire),
    PlayerMoved(PlayerWire),
    BallMoved(BallWire),
    GoalScored(PlayerWire),
    GameOver(GameStateWire),
    PlayerLeft(PlayerLeftMsg),
    GameStateUpdated(GameStateWire),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMsg {
    pub protocol_version: u32,
    pub server_version: String,
    pub self_id: String,
    pub field: FieldConfig,
    pub state: GameStateWire,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "camelCase")]
pub struct GameStateWire {
    /// Ordered `Left` first
    pub players: Vec<PlayerWire>,
    pub ball: BallWire,
    pub started: bool,
    pub winning_score: u32,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "camelCase")]
pub struct PlayerWire {
    pub id: String,
    pub name: String,
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    pub side: Side,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "camelCase")]
pub struct BallWire {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
pub struct PlayerLeftMsg {
    pub id: String,
}

// === Client -> Server ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Join { name: String },
    /// Movement intent; the direction need not be normalized
    Move { x: f64, y: f64 },
    Reset,
}

// === Conversion helpers ===

/// Round to 4 decimal places (plenty for field coordinates, keeps JSON small)
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}
