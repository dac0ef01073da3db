use arena_shared::config::Side;
use arena_shared::vec2::Vec2;

/// Longest display name kept, in characters.
pub const MAX_NAME_LEN: usize = 24;

/// A joined participant, keyed by its connection id.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub side: Side,
    pub score: u32,
}

impl Player {
    pub fn new(id: &str, name: &str, side: Side, pos: Vec2) -> Self {
        Self {
            id: id.to_string(),
            name: sanitize_name(name),
            pos,
            vel: Vec2::ZERO,
            side,
            score: 0,
        }
    }
}

/// Trim whitespace, drop control characters and cap the length.
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_LEN)
        .collect();
    if name.is_empty() {
        "Player".to_string()
    } else {
        name
    }
}
