use arena_shared::config::FieldConfig;

pub use arena_shared::config::FieldLayout;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Physics ticks per second. Each tick is one fixed step, so this also sets game speed.
    pub tick_rate_hz: u32,
    pub winning_score: u32,
    /// Open WebSocket connections allowed at once (players plus waiting sockets)
    pub max_connections: usize,
    pub field: FieldConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9001".to_string(),
            tick_rate_hz: 60,
            winning_score: 3,
            max_connections: 16,
            field: FieldConfig::horizontal(),
        }
    }
}

impl ServerConfig {
    /// Defaults with `ARENA_*` environment overrides applied.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ServerConfig::default();

        if let Some(addr) = lookup("ARENA_LISTEN_ADDR").filter(|s| !s.is_empty()) {
            config.listen_addr = addr;
        }
        if let Some(n) = lookup("ARENA_TICK_RATE_HZ").and_then(|v| v.parse().ok()) {
            config.tick_rate_hz = n;
        }
        if let Some(n) = lookup("ARENA_WINNING_SCORE").and_then(|v| v.parse().ok()) {
            config.winning_score = n;
        }
        if let Some(n) = lookup("ARENA_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            config.max_connections = n;
        }
        match lookup("ARENA_FIELD_LAYOUT").as_deref() {
            Some("horizontal") => config.field = FieldConfig::horizontal(),
            Some("vertical") => config.field = FieldConfig::vertical(),
            Some(other) => tracing::warn!("Unknown ARENA_FIELD_LAYOUT {:?}, keeping default", other),
            None => {}
        }

        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 || self.tick_rate_hz > 1000 {
            return Err("tick_rate_hz must be in 1..=1000".to_string());
        }
        if self.winning_score == 0 {
            return Err("winning_score must be > 0".to_string());
        }
        if self.max_connections < 2 {
            return Err("max_connections must allow at least two players".to_string());
        }
        self.field.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.field.layout, FieldLayout::Horizontal);
    }

    #[test]
    fn env_overrides_apply() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ARENA_LISTEN_ADDR", "127.0.0.1:7000"),
            ("ARENA_TICK_RATE_HZ", "30"),
            ("ARENA_WINNING_SCORE", "5"),
            ("ARENA_FIELD_LAYOUT", "vertical"),
        ]));
        assert_eq!(config.listen_addr, "127.0.0.1:7000");
        assert_eq!(config.tick_rate_hz, 30);
        assert_eq!(config.winning_score, 5);
        assert_eq!(config.field.layout, FieldLayout::Vertical);
    }

    #[test]
    fn unparsable_overrides_are_ignored() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ARENA_TICK_RATE_HZ", "fast"),
            ("ARENA_FIELD_LAYOUT", "diagonal"),
            ("ARENA_LISTEN_ADDR", ""),
        ]));
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.field.layout, FieldLayout::Horizontal);
        assert_eq!(config.listen_addr, "0.0.0.0:9001");
    }

    #[test]
    fn zero_tick_rate_invalid() {
        let config = ServerConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_winning_score_invalid() {
        let config = ServerConfig {
            winning_score: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_field_fails_validation() {
        let mut config = ServerConfig::default();
        config.field.friction = 0.0;
        assert!(config.validate().is_err());
    }
}
