// src/store/mod.rs - JSON-file reference store: load, apply operations, save

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};

use crate::models::general::{GeneralPatch, GeneralRecord};
use crate::models::matching::MergeOperation;
use crate::models::skill::{SkillPatch, SkillRecord};

/// Load the canonical general set. A missing file is an empty reference
/// set, so a first run bootstraps the store.
pub fn load_generals(path: &Path) -> Result<Vec<GeneralRecord>> {
    load_records(path)
}

/// Load the canonical skill set.
pub fn load_skills(path: &Path) -> Result<Vec<SkillRecord>> {
    load_records(path)
}

fn load_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        info!("store file {} does not exist yet, starting empty", path.display());
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read store file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("store file {} is not valid JSON", path.display()))
}

pub fn save_generals(path: &Path, records: &[GeneralRecord]) -> Result<()> {
    save_records(path, records)
}

pub fn save_skills(path: &Path, records: &[SkillRecord]) -> Result<()> {
    save_records(path, records)
}

fn save_records<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let raw = serde_json::to_string_pretty(records).context("failed to serialize store")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write store file {}", path.display()))?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Apply general operations in order. Updates merge into the record with
/// the matching id and stamp `updated_at`; updates for unknown ids are
/// skipped with a warning; creates append. Returns (created, updated).
pub fn apply_general_operations(
    records: &mut Vec<GeneralRecord>,
    operations: Vec<MergeOperation<GeneralPatch>>,
) -> (usize, usize) {
    let mut created = 0;
    let mut updated = 0;
    for operation in operations {
        match operation {
            MergeOperation::Update { id, fields } => {
                match records.iter_mut().find(|r| r.id == id) {
                    Some(record) => {
                        fields.apply_to(record);
                        record.updated_at = Some(Utc::now());
                        updated += 1;
                    }
                    None => warn!("update for unknown general id '{id}', skipping"),
                }
            }
            MergeOperation::Create { id, slug, fields } => {
                records.push(GeneralRecord::from_create(id, slug, fields));
                created += 1;
            }
        }
    }
    (created, updated)
}

/// Skill counterpart of [`apply_general_operations`].
pub fn apply_skill_operations(
    records: &mut Vec<SkillRecord>,
    operations: Vec<MergeOperation<SkillPatch>>,
) -> (usize, usize) {
    let mut created = 0;
    let mut updated = 0;
    for operation in operations {
        match operation {
            MergeOperation::Update { id, fields } => {
                match records.iter_mut().find(|r| r.id == id) {
                    Some(record) => {
                        fields.apply_to(record);
                        record.updated_at = Some(Utc::now());
                        updated += 1;
                    }
                    None => warn!("update for unknown skill id '{id}', skipping"),
                }
            }
            MergeOperation::Create { id, slug, fields } => {
                records.push(SkillRecord::from_create(id, slug, fields));
                created += 1;
            }
        }
    }
    (created, updated)
}
