pub mod general;
pub mod matching;
pub mod skill;

use serde::{Deserialize, Serialize};

/// Bilingual name as it appears in extracted and scraped JSON: the
/// Vietnamese display name is the primary matching key, the Chinese
/// original the secondary one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamePair {
    #[serde(default)]
    pub vi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cn: Option<String>,
}

impl NamePair {
    pub fn new(vi: impl Into<String>, cn: Option<String>) -> Self {
        Self { vi: vi.into(), cn }
    }
}
