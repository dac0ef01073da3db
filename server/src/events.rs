//! Outbound events produced by the session.
//!
//! Every mutating operation pushes its events after the state change, so a
//! drained outbox always describes state that already exists.

use crate::player::Player;
use crate::state::{Ball, GameState};

/// Who an event is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    All,
    Only(String),
}

impl Recipient {
    pub fn includes(&self, conn_id: &str) -> bool {
        match self {
            Recipient::All => true,
            Recipient::Only(id) => id == conn_id,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GameEvent {
    PlayerJoined(Player),
    WaitingForOpponent,
    GameFull,
    GameStarted(GameState),
    PlayerMoved(Player),
    BallMoved(Ball),
    GoalScored(Player),
    GameOver(GameState),
    PlayerLeft(String),
    GameStateUpdated(GameState),
}

impl GameEvent {
    /// Short name for logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined(_) => "player_joined",
            GameEvent::WaitingForOpponent => "waiting_for_opponent",
            GameEvent::GameFull => "game_full",
            GameEvent::GameStarted(_) => "game_started",
            GameEvent::PlayerMoved(_) => "player_moved",
            GameEvent::BallMoved(_) => "ball_moved",
            GameEvent::GoalScored(_) => "goal_scored",
            GameEvent::GameOver(_) => "game_over",
            GameEvent::PlayerLeft(_) => "player_left",
            GameEvent::GameStateUpdated(_) => "game_state_updated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outbound {
    pub recipient: Recipient,
    pub event: GameEvent,
}

/// Ordered queue of events waiting for the transport.
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<Outbound>,
}

impl Outbox {
    pub fn to_all(&mut self, event: GameEvent) {
        self.events.push(Outbound {
            recipient: Recipient::All,
            event,
        });
    }

    pub fn to(&mut self, conn_id: &str, event: GameEvent) {
        self.events.push(Outbound {
            recipient: Recipient::Only(conn_id.to_string()),
            event,
        });
    }

    pub fn drain(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
