//! The single match: who is playing, on which side, and when play starts,
//! resets and stops.
//!
//! `SessionManager` is the only owner of `GameState`. Every inbound intent and
//! every tick goes through `&mut self`, so mutations are serialized by
//! whoever holds the manager (the game loop task in the server).

use crate::events::{GameEvent, Outbound, Outbox};
use crate::physics::{PhysicsEngine, TickOutcome};
use crate::player::Player;
use crate::state::{Ball, GameState, Phase, MAX_PLAYERS};
use arena_shared::config::{FieldConfig, Side};
use arena_shared::vec2::Vec2;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// Both sides are taken
    GameFull,
    /// This connection already has a player
    AlreadyJoined,
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::GameFull => write!(f, "game is full"),
            JoinError::AlreadyJoined => write!(f, "already joined"),
        }
    }
}

impl std::error::Error for JoinError {}

pub struct SessionManager {
    physics: PhysicsEngine,
    state: GameState,
    outbox: Outbox,
}

impl SessionManager {
    pub fn new(field: FieldConfig, winning_score: u32) -> Self {
        let ball = Ball::at_rest(field.center(), field.ball_radius);
        Self {
            physics: PhysicsEngine::new(field),
            state: GameState::new(ball, winning_score),
            outbox: Outbox::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn field(&self) -> &FieldConfig {
        self.physics.field()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Take every event produced since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<Outbound> {
        self.outbox.drain()
    }

    /// Seat a new player on the free side. The second seat starts the match.
    pub fn join(&mut self, conn_id: &str, name: &str) -> Result<Side, JoinError> {
        if self.state.players.contains_key(conn_id) {
            return Err(JoinError::AlreadyJoined);
        }
        let Some(side) = self.state.free_side() else {
            tracing::info!("Join from {} rejected, game full", conn_id);
            self.outbox.to(conn_id, GameEvent::GameFull);
            return Err(JoinError::GameFull);
        };

        let player = Player::new(conn_id, name, side, self.physics.start_position(side));
        tracing::info!("{} joined as {:?} ({})", player.name, side, conn_id);
        self.state.players.insert(conn_id.to_string(), player.clone());
        self.outbox.to_all(GameEvent::PlayerJoined(player));

        if self.state.players.len() == MAX_PLAYERS {
            self.start_match();
            self.outbox
                .to_all(GameEvent::GameStarted(self.state.clone()));
        } else {
            self.outbox.to(conn_id, GameEvent::WaitingForOpponent);
        }
        Ok(side)
    }

    fn start_match(&mut self) {
        // A leftover winner from a finished match would start at the threshold
        if self
            .state
            .players
            .values()
            .any(|p| p.score >= self.state.winning_score)
        {
            for player in self.state.players.values_mut() {
                player.score = 0;
            }
        }
        self.state.winner = None;
        self.state.started = true;
        self.state.ball.reset(self.physics.field().center());
        tracing::info!("Match started");
    }

    /// Remove a player. Any departure ends the round. Unknown ids are ignored,
    /// so calling this twice for one connection is harmless.
    pub fn disconnect(&mut self, conn_id: &str) {
        let Some(player) = self.state.players.remove(conn_id) else {
            return;
        };
        tracing::info!("{} left ({})", player.name, conn_id);

        self.state.started = false;
        self.state.winner = None;
        self.state.ball.reset(self.physics.field().center());

        self.outbox.to_all(GameEvent::PlayerLeft(player.id));
        self.outbox
            .to_all(GameEvent::GameStateUpdated(self.state.clone()));
    }

    /// Zero scores and put everyone back on their start spots. Works during
    /// play and after a game over; ignored while waiting for players.
    pub fn reset(&mut self) {
        if self.state.phase() == Phase::WaitingForPlayers {
            return;
        }

        for player in self.state.players.values_mut() {
            player.score = 0;
            player.pos = self.physics.start_position(player.side);
            player.vel = Vec2::ZERO;
        }
        self.state.winner = None;
        self.state.started = self.state.players.len() == MAX_PLAYERS;
        self.state.ball.reset(self.physics.field().center());
        tracing::info!("Match reset");

        self.outbox
            .to_all(GameEvent::GameStateUpdated(self.state.clone()));
    }

    /// Movement intent from a connection.
    pub fn move_player(&mut self, conn_id: &str, direction: Vec2) {
        self.physics
            .apply_movement_intent(&mut self.state, &mut self.outbox, conn_id, direction);
    }

    /// One physics step.
    pub fn tick(&mut self) -> TickOutcome {
        self.physics.tick(&mut self.state, &mut self.outbox)
    }
}
