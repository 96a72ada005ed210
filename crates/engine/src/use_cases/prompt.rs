//! Image prompt construction and cache keys.
//!
//! Every generated image shares one house style. The cache key is derived
//! from the full prompt (scene prompt, era context and style), so the same
//! scene in the same era always maps to the same cached image.

use sha2::{Digest, Sha256};

pub const IMAGE_STYLE: &str = "Historical educational illustration, highly detailed, \
dramatic atmospheric lighting, painterly style inspired by classical historical art and \
illuminated manuscripts, rich earthy colors, period-accurate architecture and costumes, \
cinematic composition, no text overlays, no watermarks";

/// Model recorded for images the worker generates.
pub const IMAGE_MODEL: &str = "grok-2-image";

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scene prompt + `Setting: {era}, {region}.` (only when an era is known) + house style.
pub fn full_image_prompt(prompt: &str, era: &str, region: &str) -> String {
    let setting = if era.trim().is_empty() {
        String::new()
    } else {
        format!("Setting: {era}, {region}.")
    };
    collapse_whitespace(&format!("{prompt} {setting} {IMAGE_STYLE}"))
}

/// First 16 hex chars of SHA-256 over the trimmed, lower-cased prompt.
pub fn prompt_hash(full_prompt: &str) -> String {
    let digest = Sha256::digest(full_prompt.trim().to_lowercase().as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(16);
    hash
}

pub fn portrait_prompt(npc_name: &str, era: &str, region: &str, description: &str) -> String {
    collapse_whitespace(&format!(
        "Portrait of {npc_name}, a character from {era} {region}. {description}. \
         Close-up portrait, historically accurate costume and setting, detailed expressive face, \
         warm dramatic lighting."
    ))
}

/// `portrait_Lady_Aiko` for `Lady Aiko`.
pub fn portrait_scene_id(npc_name: &str) -> String {
    let name: String = npc_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("portrait_{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_prompt_adds_setting_and_style() {
        let full = full_image_prompt("A busy  rice market at dawn", "Edo Japan", "Kanto");
        assert!(full.starts_with("A busy rice market at dawn Setting: Edo Japan, Kanto. Historical"));
        assert!(full.ends_with("no watermarks"));
    }

    #[test]
    fn setting_is_omitted_without_era() {
        let full = full_image_prompt("A harbour", "", "Ostia");
        assert!(full.starts_with("A harbour Historical educational illustration"));
        assert!(!full.contains("Setting"));
    }

    #[test]
    fn hash_is_sixteen_hex_chars_of_sha256() {
        assert_eq!(prompt_hash("hello world"), "b94d27b9934d3e08");
        assert_eq!(prompt_hash("  Hello World "), "b94d27b9934d3e08");

        let full = full_image_prompt("A busy  rice market at dawn", "Edo Japan", "Kanto");
        assert_eq!(prompt_hash(&full), "f8fc89efaadd359d");
    }

    #[test]
    fn portrait_scene_id_replaces_spaces() {
        assert_eq!(portrait_scene_id("Lady Aiko"), "portrait_Lady_Aiko");
        let prompt = portrait_prompt("Marcus", "Roman Republic", "Latium", "A grain merchant");
        assert!(prompt.starts_with("Portrait of Marcus, a character from Roman Republic Latium. A grain merchant. Close-up"));
    }
}
