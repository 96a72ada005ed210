//! StatEngine - owns the player's health, money and inventory
//!
//! Every mutation goes through [`StatEngine::apply_delta`], which clamps
//! instead of rejecting: health stays within `0..=max_health`, money never
//! drops below zero. The applied (post-clamp) delta is returned and a
//! [`StatEvent`] is queued for each component that actually changed.

use crate::events::StatEvent;
use crate::value_objects::{AppliedDelta, PlayerStats, StatDelta};

#[derive(Debug, Clone, PartialEq)]
pub struct StatEngine {
    stats: PlayerStats,
    pending: Vec<StatEvent>,
}

impl StatEngine {
    pub fn new(stats: PlayerStats) -> Self {
        let mut engine = Self {
            stats,
            pending: Vec::new(),
        };
        engine.stats.health = engine.stats.health.min(engine.stats.max_health);
        engine
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Apply a signed delta, clamping at the bounds.
    pub fn apply_delta(&mut self, delta: &StatDelta) -> AppliedDelta {
        let mut applied = AppliedDelta::default();

        if let Some(change) = delta.health {
            let before = i64::from(self.stats.health);
            let after = (before + i64::from(change)).clamp(0, i64::from(self.stats.max_health));
            self.stats.health = u32::try_from(after).unwrap_or(self.stats.max_health);
            applied.health = after - before;
            if applied.health != 0 {
                self.pending.push(StatEvent::HealthChanged {
                    delta: applied.health,
                    health: self.stats.health,
                });
            }
        }

        if let Some(change) = delta.money {
            let before = i64::from(self.stats.money);
            let after = (before + i64::from(change)).clamp(0, i64::from(u32::MAX));
            self.stats.money = u32::try_from(after).unwrap_or(u32::MAX);
            applied.money = after - before;
            if applied.money != 0 {
                self.pending.push(StatEvent::MoneyChanged {
                    delta: applied.money,
                    money: self.stats.money,
                    currency: self.stats.currency.clone(),
                });
            }
        }

        if let Some(item) = delta.item.as_deref().filter(|i| !i.is_empty()) {
            self.stats.inventory.push(item.to_string());
            applied.item = Some(item.to_string());
            self.pending.push(StatEvent::ItemAdded {
                item: item.to_string(),
            });
        }

        applied
    }

    /// A zero cost is always affordable.
    pub fn can_afford(&self, cost: u32) -> bool {
        cost == 0 || self.stats.money >= cost
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.stats.inventory.iter().any(|i| i == item)
    }

    /// Take the events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<StatEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Replace the stats wholesale (restart, resume). Queued events are dropped.
    pub fn reset(&mut self, stats: PlayerStats) {
        *self = Self::new(stats);
    }
}
