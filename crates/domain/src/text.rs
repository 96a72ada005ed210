//! `{{placeholder}}` substitution in authored scene text.

use crate::entities::Player;
use crate::value_objects::PlayerStats;

/// Replace `{{money}}`, `{{health}}`, `{{player}}`, `{{character}}` and
/// `{{currency}}`. Unknown placeholders are left untouched.
pub fn render_placeholders(text: &str, stats: &PlayerStats, player: &Player) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }
    text.replace("{{money}}", &format!("{} {}", stats.money, stats.currency))
        .replace("{{health}}", &stats.health.to_string())
        .replace("{{player}}", &player.name)
        .replace("{{character}}", player.display_name())
        .replace("{{currency}}", &stats.currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Character;

    fn stats() -> PlayerStats {
        PlayerStats {
            health: 80,
            max_health: 100,
            money: 12,
            currency: "denarii".into(),
            inventory: Vec::new(),
        }
    }

    #[test]
    fn substitutes_every_known_placeholder() {
        let player = Player::new("Ana");
        let out = render_placeholders(
            "{{player}} has {{money}} and {{health}} health. Pay in {{currency}}.",
            &stats(),
            &player,
        );
        assert_eq!(out, "Ana has 12 denarii and 80 health. Pay in denarii.");
    }

    #[test]
    fn character_falls_back_to_player_name() {
        let mut player = Player::new("Ana");
        assert_eq!(render_placeholders("{{character}}", &stats(), &player), "Ana");
        player.character = Some(Character {
            id: None,
            name: "Merchant".into(),
            avatar: None,
            description: String::new(),
            bonus: None,
            starting_bonus: None,
        });
        assert_eq!(render_placeholders("{{character}}", &stats(), &player), "Merchant");
    }

    #[test]
    fn unknown_placeholders_survive() {
        let out = render_placeholders("{{weather}}", &stats(), &Player::default());
        assert_eq!(out, "{{weather}}");
    }
}
