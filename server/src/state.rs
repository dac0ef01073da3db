use crate::player::Player;
use arena_shared::config::Side;
use arena_shared::vec2::Vec2;
use std::collections::HashMap;

/// Players allowed in the single match.
pub const MAX_PLAYERS: usize = 2;

/// The one ball on the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f64,
}

impl Ball {
    pub fn at_rest(pos: Vec2, radius: f64) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    /// Put the ball back at `center` with no velocity.
    pub fn reset(&mut self, center: Vec2) {
        self.pos = center;
        self.vel = Vec2::ZERO;
    }
}

/// Lifecycle of the match, derived from `started` and `winner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForPlayers,
    Playing,
    GameOver,
}

/// Authoritative game state. Owned by the session, never shared.
#[derive(Debug, Clone)]
pub struct GameState {
    pub players: HashMap<String, Player>,
    pub ball: Ball,
    pub started: bool,
    pub winning_score: u32,
    pub winner: Option<String>,
}

impl GameState {
    pub fn new(ball: Ball, winning_score: u32) -> Self {
        Self {
            players: HashMap::new(),
            ball,
            started: false,
            winning_score,
            winner: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.started {
            Phase::Playing
        } else if self.winner.is_some() {
            Phase::GameOver
        } else {
            Phase::WaitingForPlayers
        }
    }

    pub fn player_on(&self, side: Side) -> Option<&Player> {
        self.players.values().find(|p| p.side == side)
    }

    pub fn player_on_mut(&mut self, side: Side) -> Option<&mut Player> {
        self.players.values_mut().find(|p| p.side == side)
    }

    /// Side for the next joiner: `Left` first, `Right` second. None when full.
    pub fn free_side(&self) -> Option<Side> {
        if self.players.len() >= MAX_PLAYERS {
            return None;
        }
        [Side::Left, Side::Right]
            .into_iter()
            .find(|side| self.player_on(*side).is_none())
    }

    /// Players ordered `Left` then `Right`.
    pub fn players_by_side(&self) -> Vec<&Player> {
        [Side::Left, Side::Right]
            .into_iter()
            .filter_map(|side| self.player_on(side))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Ball::at_rest(Vec2::new(10.0, 5.0), 0.5), 3)
    }

    fn add(state: &mut GameState, id: &str, side: Side) {
        state
            .players
            .insert(id.to_string(), Player::new(id, id, side, Vec2::ZERO));
    }

    #[test]
    fn free_side_prefers_left() {
        let mut s = state();
        assert_eq!(s.free_side(), Some(Side::Left));
        add(&mut s, "a", Side::Left);
        assert_eq!(s.free_side(), Some(Side::Right));
        add(&mut s, "b", Side::Right);
        assert_eq!(s.free_side(), None);
    }

    #[test]
    fn free_side_refills_vacated_left() {
        let mut s = state();
        add(&mut s, "b", Side::Right);
        assert_eq!(s.free_side(), Some(Side::Left));
    }

    #[test]
    fn phase_follows_flags() {
        let mut s = state();
        assert_eq!(s.phase(), Phase::WaitingForPlayers);
        s.started = true;
        assert_eq!(s.phase(), Phase::Playing);
        s.started = false;
        s.winner = Some("a".to_string());
        assert_eq!(s.phase(), Phase::GameOver);
    }

    #[test]
    fn players_by_side_orders_left_first() {
        let mut s = state();
        add(&mut s, "b", Side::Right);
        add(&mut s, "a", Side::Left);
        let ids: Vec<&str> = s.players_by_side().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn ball_reset_clears_velocity() {
        let mut ball = Ball::at_rest(Vec2::new(1.0, 1.0), 0.5);
        ball.vel = Vec2::new(3.0, -2.0);
        ball.reset(Vec2::new(10.0, 5.0));
        assert_eq!(ball.pos, Vec2::new(10.0, 5.0));
        assert_eq!(ball.vel, Vec2::ZERO);
    }
}
