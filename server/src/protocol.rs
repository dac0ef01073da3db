//! Conversion from domain state to the shared wire types.

use crate::events::GameEvent;
use crate::player::Player;
use crate::state::{Ball, GameState};
use arena_shared::protocol::{
    round4, BallWire, GameStateWire, PlayerLeftMsg, PlayerWire, ServerMsg,
};
use arena_shared::vec2::Vec2;

pub use arena_shared::protocol::{ClientMsg, WelcomeMsg, MAX_MESSAGE_SIZE, PROTOCOL_VERSION};

#[inline]
fn wire_vec(v: Vec2) -> [f64; 2] {
    [round4(v.x), round4(v.y)]
}

impl From<&Player> for PlayerWire {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            pos: wire_vec(player.pos),
            vel: wire_vec(player.vel),
            side: player.side,
            score: player.score,
        }
    }
}

impl From<&Ball> for BallWire {
    fn from(ball: &Ball) -> Self {
        Self {
            pos: wire_vec(ball.pos),
            vel: wire_vec(ball.vel),
            radius: ball.radius,
        }
    }
}

impl From<&GameState> for GameStateWire {
    fn from(state: &GameState) -> Self {
        Self {
            players: state
                .players_by_side()
                .into_iter()
                .map(PlayerWire::from)
                .collect(),
            ball: BallWire::from(&state.ball),
            started: state.started,
            winning_score: state.winning_score,
            winner: state.winner.clone(),
        }
    }
}

impl From<&GameEvent> for ServerMsg {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::PlayerJoined(p) => ServerMsg::PlayerJoined(p.into()),
            GameEvent::WaitingForOpponent => ServerMsg::WaitingForOpponent,
            GameEvent::GameFull => ServerMsg::GameFull,
            GameEvent::GameStarted(s) => ServerMsg::GameStarted(s.into()),
            GameEvent::PlayerMoved(p) => ServerMsg::PlayerMoved(p.into()),
            GameEvent::BallMoved(b) => ServerMsg::BallMoved(b.into()),
            GameEvent::GoalScored(p) => ServerMsg::GoalScored(p.into()),
            GameEvent::GameOver(s) => ServerMsg::GameOver(s.into()),
            GameEvent::PlayerLeft(id) => ServerMsg::PlayerLeft(PlayerLeftMsg { id: id.clone() }),
            GameEvent::GameStateUpdated(s) => ServerMsg::GameStateUpdated(s.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_shared::config::Side;
    use arena_shared::vec2::vec2;

    fn state() -> GameState {
        let mut state = GameState::new(Ball::at_rest(vec2(10.0, 5.0), 0.5), 3);
        for (id, side) in [("b", Side::Right), ("a", Side::Left)] {
            state
                .players
                .insert(id.to_string(), Player::new(id, id, side, vec2(1.0, 2.0)));
        }
        state
    }

    #[test]
    fn state_wire_orders_left_first() {
        let wire = GameStateWire::from(&state());
        assert_eq!(wire.players.len(), 2);
        assert_eq!(wire.players[0].side, Side::Left);
        assert_eq!(wire.players[1].side, Side::Right);
        assert_eq!(wire.ball.pos, [10.0, 5.0]);
        assert_eq!(wire.winning_score, 3);
    }

    #[test]
    fn player_wire_rounds_coordinates() {
        let mut p = Player::new("a", "Alice", Side::Left, vec2(1.234_567, 2.0));
        p.vel = vec2(0.353_553_39, -0.353_553_39);
        let wire = PlayerWire::from(&p);
        assert_eq!(wire.pos, [1.2346, 2.0]);
        assert_eq!(wire.vel, [0.3536, -0.3536]);
    }

    #[test]
    fn player_left_event_converts() {
        let msg = ServerMsg::from(&GameEvent::PlayerLeft("conn-3".to_string()));
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"player_left","id":"conn-3"}"#);
    }

    #[test]
    fn game_over_event_carries_winner() {
        let mut s = state();
        s.winner = Some("a".to_string());
        match ServerMsg::from(&GameEvent::GameOver(s)) {
            ServerMsg::GameOver(w) => assert_eq!(w.winner.as_deref(), Some("a")),
            other => panic!("Expected GameOver, got {:?}", other),
        }
    }
}
