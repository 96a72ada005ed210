//! Canned NPC lines used when the AI worker cannot be reached.
//!
//! Selection is deterministic: the pool is chosen from the chapter era and the
//! line from the conversation turn, so the same conversation replays the same
//! way with no network at all.

/// Model name reported for replies that came from the fallback pools.
pub const FALLBACK_MODEL: &str = "mock-fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraPool {
    Japan,
    Geography,
    Americas,
    Rome,
    General,
}

impl EraPool {
    /// Keyword match on the lower-cased era label.
    pub fn for_era(era: &str) -> Self {
        let era = era.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| era.contains(k));
        if has(&["japan"]) {
            Self::Japan
        } else if has(&["geography", "migration", "beringia", "andes", "amazon"]) {
            Self::Geography
        } else if has(&["americ", "native", "indigenous", "columbian"]) {
            Self::Americas
        } else if has(&["rom"]) {
            Self::Rome
        } else {
            Self::General
        }
    }

    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Japan => JAPAN,
            Self::Geography => GEOGRAPHY,
            Self::Americas => AMERICAS,
            Self::Rome => ROME,
            Self::General => GENERAL,
        }
    }
}

/// The fallback line for `era` at conversation turn `turn`.
pub fn fallback_line(era: &str, turn: usize) -> &'static str {
    let lines = EraPool::for_era(era).lines();
    lines[turn % lines.len()]
}

pub fn is_fallback_model(model: &str) -> bool {
    model == FALLBACK_MODEL
}

const JAPAN: &[&str] = &[
    "The way of the samurai is not merely combat. It is a code that governs every breath, every bow, every word spoken in the presence of one's lord. Honour is the only armour that matters.",
    "Rice feeds more than the body here. It feeds the entire order of our world. The shogun measures land in koku, the amount of rice to feed one person for a year.",
    "The Tokugawa have brought peace, yes, but peace like a heavy stone sitting on a river. Still on the surface, but with powerful currents beneath.",
    "A ronin without a lord is a ship without a rudder. In this society, your identity is your loyalty. Without a master, who are you?",
    "The cherry blossoms fall in days. That is their lesson to us: live fully, accept impermanence, and fall with grace when your time comes.",
];

const GEOGRAPHY: &[&str] = &[
    "Every river on this continent is a road. Every junction was a town, every confluence a city.",
    "The mountains do not stop people. They channel them. Different elevation, different crop, different climate. We lived in all of them at once.",
    "The first people who crossed from Asia did not know they were crossing into a new world. They were following the mammoth.",
    "Walk from the Arctic to the Amazon and count the climates. Count the languages that grew in each one. The land made us different, and that difference made us strong.",
    "The Amazon is not a jungle. It is a garden, planted and tended over thousands of years by people who knew how to read a forest.",
];

const AMERICAS: &[&str] = &[
    "We do not own this land any more than we own the air we breathe. We belong to it, care for it, and in return it feeds us.",
    "Our trade routes stretch from the sunrise coasts to the sunset mountains: copper from the great lakes, shells from the southern seas.",
    "The Great Law says that in every council we must ask whether a decision will harm the children of the seventh generation yet unborn.",
    "The corn, the beans, the squash: plant them together and watch them help each other. This is how our families work too.",
];

const ROME: &[&str] = &[
    "Bread and circuses, the senators say. Give the mob enough to eat and enough to watch, and they will forget they have no real power.",
    "These roads were not built for merchants. They were built for legions, to move armies anywhere in the empire within weeks.",
    "To be Roman is to carry Roman law wherever you walk. Even a freed slave can earn citizenship.",
    "The philosophers say Rome is eternal. But every republic becomes an empire, every empire overextends, every great city eventually feeds the grass.",
];

const GENERAL: &[&str] = &[
    "History is not a river flowing in one direction. It is an ocean, with currents pulling every way at once.",
    "Every decision echoes through generations. The choices made in moments like this one are the very things historians will puzzle over for centuries.",
    "The wise traveller asks more questions than they answer.",
    "Ordinary people in extraordinary times rarely feel extraordinary. The courage comes later, when there is no other choice.",
    "Power always thinks it will last forever. That is its greatest weakness.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_keywords_pick_pools() {
        assert_eq!(EraPool::for_era("Edo Japan (1603-1868)"), EraPool::Japan);
        assert_eq!(EraPool::for_era("Beringia Migration"), EraPool::Geography);
        assert_eq!(EraPool::for_era("Pre-Columbian Americas"), EraPool::Americas);
        assert_eq!(EraPool::for_era("Imperial Rome"), EraPool::Rome);
        assert_eq!(EraPool::for_era("Victorian London"), EraPool::General);
    }

    #[test]
    fn geography_wins_over_americas() {
        assert_eq!(EraPool::for_era("Andes of South America"), EraPool::Geography);
    }

    #[test]
    fn selection_is_deterministic_and_wraps() {
        let first = fallback_line("Rome", 0);
        assert_eq!(fallback_line("Rome", 0), first);
        assert_eq!(fallback_line("Rome", ROME.len()), first);
        assert_ne!(fallback_line("Rome", 1), first);
    }

    #[test]
    fn fallback_model_is_recognised() {
        assert!(is_fallback_model(FALLBACK_MODEL));
        assert!(!is_fallback_model("grok-3-fast"));
    }
}
