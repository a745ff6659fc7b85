// src/models/general.rs - General (character) records: candidates, canonical rows, patches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NamePair;

/// Troop compatibility grade as printed in-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TroopGrade {
    S,
    A,
    B,
    C,
}

/// Per-troop-type compatibility grades. Every field is optional because
/// vision extraction routinely misses individual cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TroopGrades {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cavalry: Option<TroopGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<TroopGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archer: Option<TroopGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spear: Option<TroopGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siege: Option<TroopGrade>,
}

impl TroopGrades {
    /// Overlay non-null grades from `other` onto `self`.
    pub fn merge_from(&mut self, other: &TroopGrades) {
        if other.cavalry.is_some() {
            self.cavalry = other.cavalry;
        }
        if other.shield.is_some() {
            self.shield = other.shield;
        }
        if other.archer.is_some() {
            self.archer = other.archer;
        }
        if other.spear.is_some() {
            self.spear = other.spear;
        }
        if other.siege.is_some() {
            self.siege = other.siege;
        }
    }
}

/// Six-attribute stat block, used for both base values and per-level growth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub politics: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charm: Option<f64>,
}

impl StatBlock {
    /// Overlay non-null stats from `other` onto `self`.
    pub fn merge_from(&mut self, other: &StatBlock) {
        if other.attack.is_some() {
            self.attack = other.attack;
        }
        if other.command.is_some() {
            self.command = other.command;
        }
        if other.intelligence.is_some() {
            self.intelligence = other.intelligence;
        }
        if other.politics.is_some() {
            self.politics = other.politics;
        }
        if other.speed.is_some() {
            self.speed = other.speed;
        }
        if other.charm.is_some() {
            self.charm = other.charm;
        }
    }
}

/// Innate-skill reference as extracted alongside a general. The name is
/// resolved against the skill reference set during reconciliation; type and
/// quality serve as corroborating attributes for low-confidence matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillHint {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// A not-yet-canonical observation of a general, from vision extraction or
/// a wiki scrape. Absent fields are null, never errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralCandidate {
    pub name: NamePair,
    #[serde(default, alias = "faction", skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troop_compatibility: Option<TroopGrades>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_stats: Option<StatBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_growth: Option<StatBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innate_skill: Option<SkillHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, rename = "_source_file", skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl GeneralCandidate {
    /// Collect every non-null attribute into a patch. The primary name is
    /// deliberately left out: updates never rename a canonical record, and
    /// the create path fills it in explicitly.
    pub fn to_patch(&self, innate_skill_id: Option<String>) -> GeneralPatch {
        GeneralPatch {
            name_vi: None,
            name_cn: self.name.cn.clone(),
            faction_id: self.faction_id.clone(),
            cost: self.cost,
            rarity: self.rarity,
            troop_grades: self.troop_compatibility.clone(),
            base_stats: self.base_stats.clone(),
            stat_growth: self.stat_growth.clone(),
            innate_skill_id,
            wiki_url: self.wiki_url.clone(),
            ref_screenshot: self.source_file.clone(),
        }
    }
}

/// The authoritative, persisted representation of a general. `id` is
/// assigned at creation and never changes; everything else is nullable
/// until some source populates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralRecord {
    pub id: String,
    pub name_vi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_cn: Option<String>,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<u8>,
    #[serde(default)]
    pub troop_grades: TroopGrades,
    #[serde(default)]
    pub base_stats: StatBlock,
    #[serde(default)]
    pub stat_growth: StatBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innate_skill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GeneralRecord {
    /// Materialize a new canonical record from a create operation.
    pub fn from_create(id: String, slug: String, mut fields: GeneralPatch) -> Self {
        let name_vi = fields.name_vi.take().unwrap_or_default();
        let mut record = GeneralRecord {
            id,
            name_vi,
            name_cn: None,
            slug,
            faction_id: None,
            cost: None,
            rarity: None,
            troop_grades: TroopGrades::default(),
            base_stats: StatBlock::default(),
            stat_growth: StatBlock::default(),
            innate_skill_id: None,
            wiki_url: None,
            ref_screenshot: None,
            updated_at: None,
        };
        fields.apply_to(&mut record);
        record
    }
}

/// Fields a merge operation wants to write. `None` means "leave the
/// canonical value alone" - last-non-null-wins, nulls never overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_vi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troop_grades: Option<TroopGrades>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_stats: Option<StatBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_growth: Option<StatBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innate_skill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_screenshot: Option<String>,
}

impl GeneralPatch {
    /// Apply this patch to a canonical record. Nested blocks merge
    /// field-wise so a partial extraction cannot wipe sibling stats.
    pub fn apply_to(&self, record: &mut GeneralRecord) {
        if let Some(name_vi) = &self.name_vi {
            record.name_vi = name_vi.clone();
        }
        if self.name_cn.is_some() {
            record.name_cn = self.name_cn.clone();
        }
        if self.faction_id.is_some() {
            record.faction_id = self.faction_id.clone();
        }
        if self.cost.is_some() {
            record.cost = self.cost;
        }
        if self.rarity.is_some() {
            record.rarity = self.rarity;
        }
        if let Some(grades) = &self.troop_grades {
            record.troop_grades.merge_from(grades);
        }
        if let Some(stats) = &self.base_stats {
            record.base_stats.merge_from(stats);
        }
        if let Some(growth) = &self.stat_growth {
            record.stat_growth.merge_from(growth);
        }
        if self.innate_skill_id.is_some() {
            record.innate_skill_id = self.innate_skill_id.clone();
        }
        if self.wiki_url.is_some() {
            record.wiki_url = self.wiki_url.clone();
        }
        if self.ref_screenshot.is_some() {
            record.ref_screenshot = self.ref_screenshot.clone();
        }
    }
}
