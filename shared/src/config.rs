use crate::vec2::{vec2, Axis, Vec2};

/// Half of the playfield a player is confined to.
/// `Left` owns the low end of the play axis, `Right` the high end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "generated/")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Which axis the goals sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "snake_case")]
pub enum FieldLayout {
    /// Goals at x = 0 and x = width, walls at the y edges.
    Horizontal,
    /// Goals at y = 0 and y = height, walls at the x edges.
    Vertical,
}

/// Player-ball contact test.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "generated/")]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionRule {
    /// Contact when centers are closer than `radius`.
    FixedRadius { radius: f64 },
    /// Contact when centers are closer than the player's current speed plus the ball radius.
    SpeedPlusBallRadius,
}

/// What happens when the ball leaves the play axis outside the goal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "snake_case")]
pub enum OutOfBoundsRule {
    /// Ball goes back to the center at rest.
    ResetBall,
    /// Ball reflects off the goal line like a wall.
    Bounce,
}

/// Playfield geometry and physics constants. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "generated/")]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub layout: FieldLayout,
    pub width: f64,
    pub height: f64,
    /// Width of the scoring mouth, centered on the goal line
    pub goal_width: f64,
    /// Distance a player covers per movement intent
    pub player_speed: f64,
    /// Multiplier from player speed to ball speed on contact
    pub ball_speed_scale: f64,
    /// Per-tick velocity multiplier applied to the ball (0, 1]
    pub friction: f64,
    /// Gap kept between players and the field/half edges
    pub boundary_buffer: f64,
    /// Fraction of speed kept after a wall bounce [0, 1]
    pub wall_restitution: f64,
    pub ball_radius: f64,
    pub collision: CollisionRule,
    pub out_of_bounds: OutOfBoundsRule,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::horizontal()
    }
}

impl FieldConfig {
    /// Side-to-side field, goals on the left and right ends.
    pub fn horizontal() -> Self {
        Self {
            layout: FieldLayout::Horizontal,
            width: 20.0,
            height: 10.0,
            goal_width: 3.0,
            player_speed: 0.5,
            ball_speed_scale: 1.5,
            friction: 0.98,
            boundary_buffer: 0.5,
            wall_restitution: 0.8,
            ball_radius: 0.5,
            collision: CollisionRule::FixedRadius { radius: 1.0 },
            out_of_bounds: OutOfBoundsRule::ResetBall,
        }
    }

    /// Top-to-bottom field, goals on the top and bottom ends.
    pub fn vertical() -> Self {
        Self {
            layout: FieldLayout::Vertical,
            width: 10.0,
            height: 20.0,
            goal_width: 3.0,
            player_speed: 0.5,
            ball_speed_scale: 1.5,
            friction: 0.98,
            boundary_buffer: 0.5,
            wall_restitution: 0.8,
            ball_radius: 0.5,
            collision: CollisionRule::SpeedPlusBallRadius,
            out_of_bounds: OutOfBoundsRule::Bounce,
        }
    }

    /// Axis the goals sit on and the halves are split along.
    pub fn play_axis(&self) -> Axis {
        match self.layout {
            FieldLayout::Horizontal => Axis::X,
            FieldLayout::Vertical => Axis::Y,
        }
    }

    /// Axis bounded by walls.
    pub fn cross_axis(&self) -> Axis {
        self.play_axis().other()
    }

    /// Field extent along `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("goal_width", self.goal_width),
            ("player_speed", self.player_speed),
            ("ball_speed_scale", self.ball_speed_scale),
            ("ball_radius", self.ball_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be finite and > 0", name));
            }
        }
        if !self.friction.is_finite() || self.friction <= 0.0 || self.friction > 1.0 {
            return Err("friction must be in (0, 1]".to_string());
        }
        if !self.wall_restitution.is_finite()
            || !(0.0..=1.0).contains(&self.wall_restitution)
        {
            return Err("wall_restitution must be in [0, 1]".to_string());
        }
        if !self.boundary_buffer.is_finite() || self.boundary_buffer < 0.0 {
            return Err("boundary_buffer must be finite and >= 0".to_string());
        }
        let half = self.extent(self.play_axis()) / 2.0;
        if 2.0 * self.boundary_buffer >= half {
            return Err("boundary_buffer leaves no room inside a half".to_string());
        }
        let goal_line = self.extent(self.cross_axis());
        if 2.0 * self.boundary_buffer >= goal_line {
            return Err("boundary_buffer leaves no room across the field".to_string());
        }
        if self.goal_width > goal_line {
            return Err("goal_width must not exceed the goal line".to_string());
        }
        if let CollisionRule::FixedRadius { radius } = self.collision {
            if !radius.is_finite() || radius <= 0.0 {
                return Err("collision radius must be finite and > 0".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(FieldConfig::horizontal().validate().is_ok());
        assert!(FieldConfig::vertical().validate().is_ok());
    }

    #[test]
    fn layout_picks_axes() {
        let h = FieldConfig::horizontal();
        assert_eq!(h.play_axis(), Axis::X);
        assert_eq!(h.cross_axis(), Axis::Y);
        let v = FieldConfig::vertical();
        assert_eq!(v.play_axis(), Axis::Y);
        assert_eq!(v.extent(v.play_axis()), 20.0);
    }

    #[test]
    fn friction_above_one_invalid() {
        let mut config = FieldConfig::default();
        config.friction = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_goal_invalid() {
        let mut config = FieldConfig::default();
        config.goal_width = 11.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn huge_buffer_invalid() {
        let mut config = FieldConfig::default();
        config.boundary_buffer = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_collision_radius_invalid() {
        let mut config = FieldConfig::default();
        config.collision = CollisionRule::FixedRadius { radius: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_json_is_camel_case() {
        let json = serde_json::to_string(&FieldConfig::horizontal()).unwrap();
        assert!(json.contains("\"goalWidth\":3.0"));
        assert!(json.contains("\"layout\":\"horizontal\""));
        assert!(json.contains("\"kind\":\"fixed_radius\""));
    }
}
