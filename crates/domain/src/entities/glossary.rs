use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
}

/// Term → entry mapping.
///
/// Glossary files come either as an object keyed by term or as an array of
/// entries carrying a `term` field; both load into the same map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Glossary(BTreeMap<String, GlossaryEntry>);

#[derive(Deserialize)]
struct TermEntry {
    term: String,
    #[serde(flatten)]
    entry: GlossaryEntry,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGlossary {
    Map(BTreeMap<String, GlossaryEntry>),
    List(Vec<TermEntry>),
}

impl<'de> Deserialize<'de> for Glossary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawGlossary::deserialize(deserializer)? {
            RawGlossary::Map(map) => Self(map),
            RawGlossary::List(list) => Self(
                list.into_iter()
                    .filter(|e| !e.term.is_empty())
                    .map(|e| (e.term, e.entry))
                    .collect(),
            ),
        })
    }
}

impl Glossary {
    pub fn get(&self, term: &str) -> Option<&GlossaryEntry> {
        self.0.get(term)
    }

    pub fn definition(&self, term: &str) -> Option<&str> {
        self.get(term)
            .map(|e| e.definition.as_str())
            .filter(|d| !d.is_empty())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GlossaryEntry)> {
        self.0.iter()
    }

    pub fn insert(&mut self, term: impl Into<String>, entry: GlossaryEntry) {
        self.0.insert(term.into(), entry);
    }
}
