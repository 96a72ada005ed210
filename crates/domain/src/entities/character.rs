use serde::{Deserialize, Serialize};

use crate::value_objects::StatDelta;

pub const DEFAULT_PLAYER_NAME: &str = "Traveller";

/// A playable character offered on the character-select scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Display label for the bonus, e.g. "+10 coins".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_bonus: Option<StatDelta>,
}

/// A non-player character shown alongside a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// The person playing: a name plus the character they picked, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default = "default_player_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.trim().is_empty() {
                default_player_name()
            } else {
                name
            },
            character: None,
        }
    }

    /// Character name when one was chosen, otherwise the player name.
    pub fn display_name(&self) -> &str {
        self.character
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(&self.name)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_NAME)
    }
}

fn default_player_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}
