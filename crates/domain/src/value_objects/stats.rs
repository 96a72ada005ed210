//! Player stats and the chapter-authored starting values.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_HEALTH: u32 = 100;
pub const DEFAULT_CURRENCY: &str = "coins";

/// Live player stats.
///
/// # Invariants
///
/// - `health <= max_health` after every mutation through `StatEngine`
/// - `money` is never negative (unsigned)
/// - `inventory` keeps acquisition order and may contain duplicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub health: u32,
    pub max_health: u32,
    pub money: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub inventory: Vec<String>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        StartingStats::default().to_player_stats()
    }
}

/// `startingStats` as written in chapter files. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<u32>,
    #[serde(default)]
    pub money: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub inventory: Vec<String>,
}

impl StartingStats {
    /// Max health falls back to the starting health, then to 100.
    pub fn max_health(&self) -> u32 {
        self.max_health
            .or(self.health)
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_HEALTH)
    }

    pub fn to_player_stats(&self) -> PlayerStats {
        let max_health = self.max_health();
        PlayerStats {
            health: self.health.unwrap_or(max_health).min(max_health),
            max_health,
            money: self.money,
            currency: self
                .currency
                .clone()
                .unwrap_or_else(default_currency),
            inventory: self.inventory.clone(),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_health_prefers_explicit_value() {
        let starting = StartingStats {
            health: Some(80),
            max_health: Some(120),
            ..StartingStats::default()
        };
        let stats = starting.to_player_stats();
        assert_eq!(stats.max_health, 120);
        assert_eq!(stats.health, 80);
    }

    #[test]
    fn max_health_falls_back_to_starting_health() {
        let starting: StartingStats =
            serde_json::from_str(r#"{"health": 70, "money": 12, "currency": "mon"}"#)
                .expect("parse");
        let stats = starting.to_player_stats();
        assert_eq!(stats.max_health, 70);
        assert_eq!(stats.health, 70);
        assert_eq!(stats.money, 12);
        assert_eq!(stats.currency, "mon");
    }

    #[test]
    fn empty_starting_stats_use_defaults() {
        let stats = StartingStats::default().to_player_stats();
        assert_eq!(stats.max_health, DEFAULT_MAX_HEALTH);
        assert_eq!(stats.health, DEFAULT_MAX_HEALTH);
        assert_eq!(stats.money, 0);
        assert_eq!(stats.currency, DEFAULT_CURRENCY);
    }
}
