//! Player movement, ball motion, collisions and scoring.
//!
//! One engine serves every field layout: the `FieldConfig` says which axis
//! carries the goals, how contact is tested and what a missed goal does.
//!
//! Motion is integrated in whole steps. A movement intent moves a player by
//! exactly `player_speed`, a tick moves the ball by exactly its velocity.
//! Nothing is scaled by wall-clock time, so the tick rate sets game speed.

use crate::events::{GameEvent, Outbox};
use crate::player::Player;
use crate::state::{Ball, GameState};
use arena_shared::config::{CollisionRule, FieldConfig, OutOfBoundsRule, Side};
use arena_shared::vec2::{add, distance, length, normalize_or_zero, scale, sub, Vec2};

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Game not running
    Idle,
    /// Ball advanced and the new state was broadcast
    Moved,
    /// Ball left the field outside a goal and went back to center
    BallReset,
    Goal { scorer: Side },
    GameOver { winner: String },
}

/// Axis-aligned rectangle a player may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    #[cfg(test)]
    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

pub struct PhysicsEngine {
    field: FieldConfig,
}

impl PhysicsEngine {
    pub fn new(field: FieldConfig) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &FieldConfig {
        &self.field
    }

    /// Quarter of the way into the side's half, centered across the field.
    pub fn start_position(&self, side: Side) -> Vec2 {
        let play = self.field.play_axis();
        let len = self.field.extent(play);
        let along = match side {
            Side::Left => len * 0.25,
            Side::Right => len * 0.75,
        };
        self.field.center().with(play, along)
    }

    /// Region of the side's half, shrunk by the boundary buffer on every edge.
    pub fn side_bounds(&self, side: Side) -> Bounds {
        let play = self.field.play_axis();
        let cross = self.field.cross_axis();
        let len = self.field.extent(play);
        let half = len / 2.0;
        let buffer = self.field.boundary_buffer;

        let (lo, hi) = match side {
            Side::Left => (buffer, half - buffer),
            Side::Right => (half + buffer, len - buffer),
        };
        let cross_hi = self.field.extent(cross) - buffer;

        Bounds {
            min: Vec2::ZERO.with(play, lo).with(cross, buffer),
            max: Vec2::ZERO.with(play, hi).with(cross, cross_hi),
        }
    }

    /// Move a player one step in `direction`. Ignored unless the game is
    /// running and the player exists.
    pub fn apply_movement_intent(
        &self,
        state: &mut GameState,
        out: &mut Outbox,
        conn_id: &str,
        direction: Vec2,
    ) {
        if !state.started {
            tracing::debug!("Move from {} ignored, game not started", conn_id);
            return;
        }
        let Some(player) = state.players.get_mut(conn_id) else {
            tracing::debug!("Move from unknown player {} ignored", conn_id);
            return;
        };

        player.vel = scale(normalize_or_zero(direction), self.field.player_speed);
        let target = add(player.pos, player.vel);
        player.pos = self.side_bounds(player.side).clamp(target);

        let moved = player.clone();
        out.to_all(GameEvent::PlayerMoved(moved.clone()));
        self.check_collision(&moved, &mut state.ball, out);
    }

    /// Contact distance for this player against the ball.
    pub fn collision_threshold(&self, player: &Player, ball: &Ball) -> f64 {
        match self.field.collision {
            CollisionRule::FixedRadius { radius } => radius,
            CollisionRule::SpeedPlusBallRadius => length(player.vel) + ball.radius,
        }
    }

    /// Kick the ball away from the player when they touch. Returns true on contact.
    pub fn check_collision(&self, player: &Player, ball: &mut Ball, out: &mut Outbox) -> bool {
        if distance(player.pos, ball.pos) >= self.collision_threshold(player, ball) {
            return false;
        }
        let away = normalize_or_zero(sub(ball.pos, player.pos));
        let speed = length(player.vel) * self.field.ball_speed_scale;
        ball.vel = scale(away, speed);
        out.to_all(GameEvent::BallMoved(ball.clone()));
        true
    }

    /// Advance the ball one step.
    pub fn tick(&self, state: &mut GameState, out: &mut Outbox) -> TickOutcome {
        if !state.started {
            return TickOutcome::Idle;
        }

        let play = self.field.play_axis();
        let cross = self.field.cross_axis();
        let play_len = self.field.extent(play);
        let cross_len = self.field.extent(cross);
        let restitution = self.field.wall_restitution;

        let mut pos = add(state.ball.pos, state.ball.vel);
        let mut vel = scale(state.ball.vel, self.field.friction);

        // Side walls: reflect with energy loss
        let c = pos.get(cross);
        if c < 0.0 || c > cross_len {
            vel = vel.with(cross, -vel.get(cross) * restitution);
            pos = pos.with(cross, c.clamp(0.0, cross_len));
        }

        let p = pos.get(play);
        if p < 0.0 || p > play_len {
            let defending = if p < 0.0 { Side::Left } else { Side::Right };
            let offset = (pos.get(cross) - cross_len / 2.0).abs();
            if offset <= self.field.goal_width / 2.0 {
                return self.score_goal(state, out, defending.opponent());
            }
            match self.field.out_of_bounds {
                OutOfBoundsRule::ResetBall => {
                    state.ball.reset(self.field.center());
                    return TickOutcome::BallReset;
                }
                OutOfBoundsRule::Bounce => {
                    vel = vel.with(play, -vel.get(play) * restitution);
                    pos = pos.with(play, p.clamp(0.0, play_len));
                }
            }
        }

        state.ball.pos = pos;
        state.ball.vel = vel;
        out.to_all(GameEvent::GameStateUpdated(state.clone()));
        TickOutcome::Moved
    }

    fn score_goal(&self, state: &mut GameState, out: &mut Outbox, scorer: Side) -> TickOutcome {
        state.ball.reset(self.field.center());

        let winning_score = state.winning_score;
        let Some(player) = state.player_on_mut(scorer) else {
            return TickOutcome::BallReset;
        };
        player.score += 1;
        let player = player.clone();
        tracing::info!("{} ({:?}) scored, now {}", player.name, scorer, player.score);
        out.to_all(GameEvent::GoalScored(player.clone()));

        if player.score >= winning_score {
            state.winner = Some(player.id.clone());
            state.started = false;
            tracing::info!("{} wins {}", player.name, player.score);
            out.to_all(GameEvent::GameOver(state.clone()));
            return TickOutcome::GameOver { winner: player.id };
        }
        TickOutcome::Goal { scorer }
    }
}
