//! Signed stat changes and what actually happened when they were applied.

use serde::{Deserialize, Serialize};

/// A signed change to health, money and inventory.
///
/// Authored as `statChange` / `startingBonus` in chapter files. Every
/// component is optional; an empty delta is valid and changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

impl StatDelta {
    pub fn health(amount: i32) -> Self {
        Self {
            health: Some(amount),
            ..Self::default()
        }
    }

    pub fn money(amount: i32) -> Self {
        Self {
            money: Some(amount),
            ..Self::default()
        }
    }

    pub fn item(name: impl Into<String>) -> Self {
        Self {
            item: Some(name.into()),
            ..Self::default()
        }
    }

    /// Money delta for paying `cost`. Costs beyond `i32::MAX` saturate.
    pub fn spend(cost: u32) -> Self {
        Self::money(-(i32::try_from(cost).unwrap_or(i32::MAX)))
    }

    pub fn with_health(mut self, amount: i32) -> Self {
        self.health = Some(amount);
        self
    }

    pub fn with_money(mut self, amount: i32) -> Self {
        self.money = Some(amount);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.health.is_none() && self.money.is_none() && self.item.is_none()
    }
}

/// The delta that actually landed after clamping.
///
/// A `-20` health hit with 5 health left reports `health: -5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDelta {
    pub health: i64,
    pub money: i64,
    pub item: Option<String>,
}

impl AppliedDelta {
    pub fn is_empty(&self) -> bool {
        self.health == 0 && self.money == 0 && self.item.is_none()
    }
}
