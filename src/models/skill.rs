// src/models/skill.rs - Skill (ability) records: candidates, canonical rows, patches

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::NamePair;

/// Map a scraped or extracted skill-type label to its canonical type id.
/// Labels show up both as English ids and as Vietnamese display names.
static SKILL_TYPE_IDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("command", "command"),
        ("active", "active"),
        ("passive", "passive"),
        ("pursuit", "pursuit"),
        ("assault", "assault"),
        ("troop", "troop"),
        ("formation", "formation"),
        ("internal", "internal"),
        ("chỉ huy", "command"),
        ("chủ động", "active"),
        ("bị động", "passive"),
        ("truy kích", "pursuit"),
        ("đột kích", "assault"),
        ("binh chủng", "troop"),
        ("trận pháp", "formation"),
        ("nội chính", "internal"),
    ])
});

/// Resolve a type label to a canonical type id. Unknown labels pass through
/// lowercased so new types still round-trip.
pub fn canonical_type_id(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    Some(
        SKILL_TYPE_IDS
            .get(lowered.as_str())
            .map(|id| (*id).to_string())
            .unwrap_or(lowered),
    )
}

/// A not-yet-canonical observation of a skill from a wiki scrape or from
/// the skill block of an extracted general screenshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillCandidate {
    pub name: NamePair,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    /// Quality grade as scraped (S/A/B/C). Kept free-form and compared
    /// case-insensitively because sources disagree on casing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_rate: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_vi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associated_generals: Vec<String>,
}

impl SkillCandidate {
    pub fn to_patch(&self) -> SkillPatch {
        SkillPatch {
            name_vi: None,
            name_cn: self.name.cn.clone(),
            type_id: self.type_id.clone(),
            quality: self.quality.clone(),
            trigger_rate: self.trigger_rate,
            source_type: self.source_type.clone(),
            effect_cn: self.effect_cn.clone(),
            effect_vi: self.effect_vi.clone(),
            wiki_url: self.wiki_url.clone(),
            associated_generals: if self.associated_generals.is_empty() {
                None
            } else {
                Some(self.associated_generals.clone())
            },
        }
    }
}

/// The authoritative, persisted representation of a skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: String,
    pub name_vi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_cn: Option<String>,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_rate: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_vi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associated_generals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SkillRecord {
    pub fn from_create(id: String, slug: String, mut fields: SkillPatch) -> Self {
        let name_vi = fields.name_vi.take().unwrap_or_default();
        let mut record = SkillRecord {
            id,
            name_vi,
            name_cn: None,
            slug,
            type_id: None,
            quality: None,
            trigger_rate: None,
            source_type: None,
            effect_cn: None,
            effect_vi: None,
            wiki_url: None,
            associated_generals: Vec::new(),
            updated_at: None,
        };
        fields.apply_to(&mut record);
        record
    }
}

/// Non-null fields a merge operation wants to write on a skill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_vi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_rate: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_vi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_generals: Option<Vec<String>>,
}

impl SkillPatch {
    pub fn apply_to(&self, record: &mut SkillRecord) {
        if let Some(name_vi) = &self.name_vi {
            record.name_vi = name_vi.clone();
        }
        if self.name_cn.is_some() {
            record.name_cn = self.name_cn.clone();
        }
        if self.type_id.is_some() {
            record.type_id = self.type_id.clone();
        }
        if self.quality.is_some() {
            record.quality = self.quality.clone();
        }
        if self.trigger_rate.is_some() {
            record.trigger_rate = self.trigger_rate;
        }
        if self.source_type.is_some() {
            record.source_type = self.source_type.clone();
        }
        if self.effect_cn.is_some() {
            record.effect_cn = self.effect_cn.clone();
        }
        if self.effect_vi.is_some() {
            record.effect_vi = self.effect_vi.clone();
        }
        if self.wiki_url.is_some() {
            record.wiki_url = self.wiki_url.clone();
        }
        if let Some(generals) = &self.associated_generals {
            record.associated_generals = generals.clone();
        }
    }
}
