//! Runtime configuration from environment variables.
//!
//! HOST (0.0.0.0), PORT (8080), POINTS_PER_WIN (2), POINTS_PER_LOSS (0),
//! DEFAULT_GROUP_SIZE (4), MAX_BOARDS (20).

use crate::logic::PointsRule;
use crate::models::Tournament;
use std::str::FromStr;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Pool-stage points per win/loss.
    pub points: PointsRule,
    /// Group size for new tournaments.
    pub default_group_size: usize,
    /// Upper bound for the board scheduler.
    pub max_boards: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            points: PointsRule::default(),
            default_group_size: Tournament::DEFAULT_GROUP_SIZE,
            max_boards: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing or unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let group_size = parse_or(&lookup, "DEFAULT_GROUP_SIZE", defaults.default_group_size);
        let max_boards = parse_or(&lookup, "MAX_BOARDS", defaults.max_boards);
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            points: PointsRule {
                win: parse_or(&lookup, "POINTS_PER_WIN", defaults.points.win),
                loss: parse_or(&lookup, "POINTS_PER_LOSS", defaults.points.loss),
            },
            default_group_size: if group_size >= 2 { group_size } else { defaults.default_group_size },
            max_boards: max_boards.max(1),
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn values_are_parsed_and_bad_ones_ignored() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("POINTS_PER_WIN", "1"),
            ("MAX_BOARDS", "lots"),
            ("DEFAULT_GROUP_SIZE", "1"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.points.win, 1);
        assert_eq!(config.max_boards, 20);
        assert_eq!(config.default_group_size, 4);
    }
}
