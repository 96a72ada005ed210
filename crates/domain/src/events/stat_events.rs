//! Stat change events
//!
//! Returned by `StatEngine` for every non-zero component of an applied delta.
//! The session drains them after each action to persist progress and to show
//! notifications.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatEvent {
    HealthChanged { delta: i64, health: u32 },
    MoneyChanged { delta: i64, money: u32, currency: String },
    ItemAdded { item: String },
}

impl StatEvent {
    /// Short notification text.
    pub fn message(&self) -> String {
        match self {
            Self::HealthChanged { delta, .. } if *delta > 0 => format!("+{} health", delta),
            Self::HealthChanged { delta, .. } => format!("{} health", delta),
            Self::MoneyChanged {
                delta, currency, ..
            } if *delta > 0 => format!("+{} {} earned", delta, currency),
            Self::MoneyChanged {
                delta, currency, ..
            } => format!("{} {} spent", delta.unsigned_abs(), currency),
            Self::ItemAdded { item } => format!("Added: {}", item),
        }
    }

    pub fn is_loss(&self) -> bool {
        match self {
            Self::HealthChanged { delta, .. } | Self::MoneyChanged { delta, .. } => *delta < 0,
            Self::ItemAdded { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_naturally() {
        assert_eq!(
            StatEvent::HealthChanged { delta: 5, health: 50 }.message(),
            "+5 health"
        );
        assert_eq!(
            StatEvent::HealthChanged { delta: -5, health: 45 }.message(),
            "-5 health"
        );
        let spent = StatEvent::MoneyChanged {
            delta: -3,
            money: 0,
            currency: "coins".into(),
        };
        assert_eq!(spent.message(), "3 coins spent");
        assert!(spent.is_loss());
        assert_eq!(
            StatEvent::ItemAdded { item: "Horse".into() }.message(),
            "Added: Horse"
        );
    }
}
