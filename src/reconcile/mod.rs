// src/reconcile/mod.rs - Batch reconciliation of candidates against a reference snapshot

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::matching::general::find_matching_general;
use crate::matching::skill::find_matching_skill;
use crate::matching::MatcherConfig;
use crate::merge::{resolve_general, resolve_skill, NewIdSource, SlugRegistry};
use crate::models::general::{GeneralCandidate, GeneralPatch, GeneralRecord, SkillHint};
use crate::models::matching::{MatchResult, MergeOperation};
use crate::models::skill::{canonical_type_id, SkillCandidate, SkillPatch, SkillRecord};
use crate::models::NamePair;

/// Innate-skill link statistics for a generals run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillLinkReport {
    pub linked: usize,
    /// "general: skill name" entries that could not be resolved.
    pub unlinked: Vec<String>,
}

/// What a batch run did, for the human running it. Unmatched candidates are
/// listed by name so nothing is silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub total: usize,
    pub matched: usize,
    pub created: usize,
    pub unmatched: usize,
    pub unmatched_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_links: Option<SkillLinkReport>,
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Candidates processed: {}", self.total)?;
        writeln!(f, "Matched:   {}", self.matched)?;
        writeln!(f, "Created:   {}", self.created)?;
        writeln!(f, "Unmatched: {}", self.unmatched)?;
        if !self.unmatched_names.is_empty() {
            writeln!(f, "\nUnmatched candidates:")?;
            for name in &self.unmatched_names {
                if name.trim().is_empty() {
                    writeln!(f, "  - (empty name)")?;
                } else {
                    writeln!(f, "  - {name}")?;
                }
            }
        }
        if let Some(links) = &self.skill_links {
            writeln!(f, "\nInnate skills linked: {}", links.linked)?;
            if !links.unlinked.is_empty() {
                writeln!(f, "Unlinked skills:")?;
                for entry in &links.unlinked {
                    writeln!(f, "  - {entry}")?;
                }
            }
        }
        Ok(())
    }
}

/// Operations to apply plus the report describing them.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome<F> {
    pub operations: Vec<MergeOperation<F>>,
    pub report: ReconciliationReport,
}

/// Reconcile extracted general candidates against the canonical general
/// set, resolving each candidate's innate-skill hint against the canonical
/// skill set along the way.
///
/// Every candidate is matched against the reference slice as it was at the
/// start of the run: records created by this batch are not visible to later
/// candidates, so duplicate new entities in one batch create two records.
/// Slugs are the one exception - the registry spans the whole batch.
pub fn reconcile_generals(
    candidates: &[GeneralCandidate],
    generals: &[GeneralRecord],
    skills: &[SkillRecord],
    config: &MatcherConfig,
    id_source: NewIdSource,
) -> ReconcileOutcome<GeneralPatch> {
    let mut slugs = SlugRegistry::from_existing(generals.iter().map(|g| g.slug.clone()));
    let mut report = ReconciliationReport {
        total: candidates.len(),
        ..Default::default()
    };
    let mut links = SkillLinkReport::default();
    let mut operations = Vec::new();

    for candidate in candidates {
        if candidate.name.vi.trim().is_empty() {
            report.unmatched += 1;
            report.unmatched_names.push(candidate.name.vi.clone());
            continue;
        }

        let innate_skill_id = resolve_innate_skill(candidate, skills, config, &mut links);

        let result = find_matching_general(candidate, generals, config);
        match &result {
            MatchResult::Matched { id, tier } => {
                debug!(
                    "general '{}' matched {} via {}",
                    candidate.name.vi,
                    id,
                    tier.as_str()
                );
                report.matched += 1;
            }
            MatchResult::Unmatched => {
                debug!("general '{}' has no match, creating", candidate.name.vi);
                report.created += 1;
            }
        }
        operations.push(resolve_general(
            candidate,
            result,
            innate_skill_id,
            config,
            &mut slugs,
            id_source,
        ));
    }

    report.skill_links = Some(links);
    ReconcileOutcome { operations, report }
}

/// Reconcile scraped skill candidates against the canonical skill set.
pub fn reconcile_skills(
    candidates: &[SkillCandidate],
    skills: &[SkillRecord],
    config: &MatcherConfig,
    id_source: NewIdSource,
) -> ReconcileOutcome<SkillPatch> {
    let mut slugs = SlugRegistry::from_existing(skills.iter().map(|s| s.slug.clone()));
    let mut report = ReconciliationReport {
        total: candidates.len(),
        ..Default::default()
    };
    let mut operations = Vec::new();

    for candidate in candidates {
        if candidate.name.vi.trim().is_empty() {
            report.unmatched += 1;
            report.unmatched_names.push(candidate.name.vi.clone());
            continue;
        }

        let result = find_matching_skill(candidate, skills, config);
        match &result {
            MatchResult::Matched { id, tier } => {
                debug!(
                    "skill '{}' matched {} via {}",
                    candidate.name.vi,
                    id,
                    tier.as_str()
                );
                report.matched += 1;
            }
            MatchResult::Unmatched => {
                debug!("skill '{}' has no match, creating", candidate.name.vi);
                report.created += 1;
            }
        }
        operations.push(resolve_skill(candidate, result, config, &mut slugs, id_source));
    }

    ReconcileOutcome { operations, report }
}

/// Resolve a general's innate-skill hint to a canonical skill id using the
/// full skill matcher, fuzzy tiers included. Misses are reported, never
/// fatal: the general still reconciles without the link.
fn resolve_innate_skill(
    candidate: &GeneralCandidate,
    skills: &[SkillRecord],
    config: &MatcherConfig,
    links: &mut SkillLinkReport,
) -> Option<String> {
    let hint = candidate.innate_skill.as_ref()?;
    if hint.name.trim().is_empty() {
        return None;
    }
    let skill_candidate = hint_to_candidate(hint);
    match find_matching_skill(&skill_candidate, skills, config) {
        MatchResult::Matched { id, .. } => {
            links.linked += 1;
            Some(id)
        }
        MatchResult::Unmatched => {
            links
                .unlinked
                .push(format!("{}: {}", candidate.name.vi, hint.name));
            None
        }
    }
}

fn hint_to_candidate(hint: &SkillHint) -> SkillCandidate {
    SkillCandidate {
        name: NamePair::new(hint.name.clone(), None),
        type_id: hint.type_name.as_deref().and_then(canonical_type_id),
        quality: hint.quality.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general_record(id: &str, vi: &str, slug: &str) -> GeneralRecord {
        GeneralRecord {
            id: id.into(),
            name_vi: vi.into(),
            name_cn: None,
            slug: slug.into(),
            faction_id: None,
            cost: None,
            rarity: None,
            troop_grades: Default::default(),
            base_stats: Default::default(),
            stat_growth: Default::default(),
            innate_skill_id: None,
            wiki_url: None,
            ref_screenshot: None,
            updated_at: None,
        }
    }

    fn skill_record(id: &str, vi: &str, type_id: Option<&str>) -> SkillRecord {
        SkillRecord {
            id: id.into(),
            name_vi: vi.into(),
            name_cn: None,
            slug: String::new(),
            type_id: type_id.map(Into::into),
            quality: None,
            trigger_rate: None,
            source_type: None,
            effect_cn: None,
            effect_vi: None,
            wiki_url: None,
            associated_generals: Vec::new(),
            updated_at: None,
        }
    }

    fn general_candidate(vi: &str) -> GeneralCandidate {
        GeneralCandidate {
            name: NamePair::new(vi, None),
            ..Default::default()
        }
    }

    #[test]
    fn batch_counts_match_create_and_skip() {
        let reference = vec![general_record("1", "Tuấn Úc", "tuan-uc")];
        let candidates = vec![
            general_candidate("tuan uc"),
            general_candidate("Trương Phi"),
            general_candidate(""),
        ];
        let config = MatcherConfig::default();
        let outcome =
            reconcile_generals(&candidates, &reference, &[], &config, NewIdSource::PrimaryName);

        assert_eq!(outcome.report.total, 3);
        assert_eq!(outcome.report.matched, 1);
        assert_eq!(outcome.report.created, 1);
        assert_eq!(outcome.report.unmatched, 1);
        assert_eq!(outcome.report.unmatched_names, vec![String::new()]);
        // Skipped candidates emit no operation.
        assert_eq!(outcome.operations.len(), 2);
    }

    #[test]
    fn operations_preserve_input_order() {
        let candidates = vec![general_candidate("Điển Vi"), general_candidate("Hứa Chử")];
        let config = MatcherConfig::default();
        let outcome = reconcile_generals(&candidates, &[], &[], &config, NewIdSource::PrimaryName);
        let ids: Vec<_> = outcome.operations.iter().map(|op| op.record_id()).collect();
        assert_eq!(ids, vec!["Điển Vi", "Hứa Chử"]);
    }

    #[test]
    fn in_batch_duplicates_create_twice_with_distinct_slugs() {
        // Matching sees only the original snapshot, so the second candidate
        // does not find the first one's create. Kept deliberately: the
        // operation counts are part of the observable contract.
        let candidates = vec![general_candidate("Điển Vi"), general_candidate("Điển Vi")];
        let config = MatcherConfig::default();
        let outcome = reconcile_generals(&candidates, &[], &[], &config, NewIdSource::PrimaryName);
        assert_eq!(outcome.report.created, 2);
        let slugs: Vec<_> = outcome
            .operations
            .iter()
            .map(|op| match op {
                MergeOperation::Create { slug, .. } => slug.clone(),
                _ => panic!("expected create"),
            })
            .collect();
        assert_eq!(slugs, vec!["dien-vi", "dien-vi-2"]);
    }

    #[test]
    fn innate_skill_hint_links_into_the_patch() {
        let generals = vec![general_record("1", "Tuấn Úc", "tuan-uc")];
        let skills = vec![skill_record("7", "Thần Cơ Mạc Đoán", Some("command"))];
        let mut candidate = general_candidate("Tuấn Úc");
        candidate.innate_skill = Some(SkillHint {
            name: "Thần Cơ Mạc Trắc".into(),
            type_name: Some("Chỉ huy".into()),
            quality: None,
        });
        let config = MatcherConfig::default();
        let outcome =
            reconcile_generals(&[candidate], &generals, &skills, &config, NewIdSource::PrimaryName);

        let links = outcome.report.skill_links.as_ref().unwrap();
        assert_eq!(links.linked, 1);
        assert!(links.unlinked.is_empty());
        match &outcome.operations[0] {
            MergeOperation::Update { fields, .. } => {
                assert_eq!(fields.innate_skill_id.as_deref(), Some("7"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_hints_are_reported_not_fatal() {
        let generals = vec![general_record("1", "Tuấn Úc", "tuan-uc")];
        let mut candidate = general_candidate("Tuấn Úc");
        candidate.innate_skill = Some(SkillHint {
            name: "Vô Trung Sinh Hữu".into(),
            type_name: None,
            quality: None,
        });
        let config = MatcherConfig::default();
        let outcome =
            reconcile_generals(&[candidate], &generals, &[], &config, NewIdSource::PrimaryName);

        assert_eq!(outcome.report.matched, 1);
        let links = outcome.report.skill_links.as_ref().unwrap();
        assert_eq!(links.linked, 0);
        assert_eq!(links.unlinked, vec!["Tuấn Úc: Vô Trung Sinh Hữu".to_string()]);
    }

    #[test]
    fn skills_batch_runs_fuzzy_matching() {
        let skills = vec![skill_record("7", "Thần Cơ Mạc Đoán", Some("command"))];
        let candidate = SkillCandidate {
            name: NamePair::new("Thần Cơ Mạc Trắc", None),
            type_id: Some("command".into()),
            ..Default::default()
        };
        let config = MatcherConfig::default();
        let outcome = reconcile_skills(&[candidate], &skills, &config, NewIdSource::PrimaryName);
        assert_eq!(outcome.report.matched, 1);
        match &outcome.operations[0] {
            MergeOperation::Update { id, .. } => assert_eq!(id, "7"),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn report_display_flags_empty_names() {
        let report = ReconciliationReport {
            total: 1,
            unmatched: 1,
            unmatched_names: vec![String::new()],
            ..Default::default()
        };
        let rendered = report.to_string();
        assert!(rendered.contains("(empty name)"));
        assert!(rendered.contains("Unmatched: 1"));
    }
}
