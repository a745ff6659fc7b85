// src/translate/mod.rs - Sino-Vietnamese (Hán-Việt) transliteration lookup

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

/// Character-by-character Hán-Việt lookup table. The dictionary itself is
/// data, injected from a JSON file of the form `{"曹": "Tào", ...}`; this
/// type only applies it.
#[derive(Debug, Clone, Default)]
pub struct HanVietTable {
    map: HashMap<char, String>,
}

impl HanVietTable {
    pub fn from_map(map: HashMap<char, String>) -> Self {
        Self { map }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dictionary {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("dictionary {} is not valid JSON", path.display()))?;
        let mut map = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    map.insert(c, value);
                }
                _ => anyhow::bail!(
                    "dictionary {} has a non-single-character key: {key:?}",
                    path.display()
                ),
            }
        }
        info!("loaded {} Hán-Việt entries from {}", map.len(), path.display());
        Ok(Self { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Transliterate character by character, joining syllables with single
    /// spaces. Characters missing from the dictionary come back bracketed
    /// so the gaps are visible for manual follow-up.
    pub fn transliterate(&self, text: &str) -> String {
        let mut parts = Vec::new();
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            match self.map.get(&c) {
                Some(syllable) => parts.push(syllable.clone()),
                None => parts.push(format!("[{c}]")),
            }
        }
        parts.join(" ")
    }

    /// Whether every character of `text` has a dictionary entry.
    pub fn covers(&self, text: &str) -> bool {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| self.map.contains_key(&c))
    }
}
