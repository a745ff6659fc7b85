// src/matching/mod.rs - Tiered entity matching against a canonical reference set

pub mod general;
pub mod normalize;
pub mod similarity;
pub mod skill;

use crate::models::general::GeneralRecord;
use crate::models::matching::{MatchResult, MatchTier};
use crate::models::skill::SkillRecord;
use normalize::Normalizer;

/// Minimum normalized similarity for an unassisted fuzzy match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.90;
/// Minimum similarity when a corroborating attribute (type or quality)
/// agrees between candidate and reference.
pub const FALLBACK_MATCH_THRESHOLD: f64 = 0.80;

/// Matching configuration. The normalizer carries the injected diacritics
/// table and variant marker; thresholds gate the skill fuzzy tiers.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub normalizer: Normalizer,
    pub fuzzy_threshold: f64,
    pub fallback_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::with_defaults(),
            fuzzy_threshold: FUZZY_MATCH_THRESHOLD,
            fallback_threshold: FALLBACK_MATCH_THRESHOLD,
        }
    }
}

/// Canonical record kinds the tier functions can scan.
pub trait NamedRecord {
    fn record_id(&self) -> &str;
    fn primary_name(&self) -> &str;
    fn secondary_name(&self) -> Option<&str>;
}

impl NamedRecord for GeneralRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn primary_name(&self) -> &str {
        &self.name_vi
    }
    fn secondary_name(&self) -> Option<&str> {
        self.name_cn.as_deref()
    }
}

impl NamedRecord for SkillRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn primary_name(&self) -> &str {
        &self.name_vi
    }
    fn secondary_name(&self) -> Option<&str> {
        self.name_cn.as_deref()
    }
}

/// One matching strategy: `Some` on success, `None` to fall through to the
/// next tier.
pub type Tier<R> =
    fn(&str, Option<&str>, &[R], &MatcherConfig) -> Option<MatchResult>;

/// Run an ordered tier list, first success wins. Reference iteration order
/// is the slice order, so results are deterministic for a given input.
pub fn run_tiers<R: NamedRecord>(
    primary: &str,
    secondary: Option<&str>,
    reference: &[R],
    config: &MatcherConfig,
    tiers: &[Tier<R>],
) -> MatchResult {
    if primary.trim().is_empty() {
        return MatchResult::Unmatched;
    }
    for tier in tiers {
        if let Some(result) = tier(primary, secondary, reference, config) {
            return result;
        }
    }
    MatchResult::Unmatched
}

/// Tier 1: case-insensitive, whitespace-trimmed equality on primary names.
pub fn exact_primary<R: NamedRecord>(
    primary: &str,
    _secondary: Option<&str>,
    reference: &[R],
    _config: &MatcherConfig,
) -> Option<MatchResult> {
    let needle = primary.trim().to_lowercase();
    reference
        .iter()
        .find(|r| r.primary_name().trim().to_lowercase() == needle)
        .map(|r| MatchResult::matched(r.record_id(), MatchTier::ExactPrimary))
}

/// Tier 2: same equality on secondary names, when the candidate has one.
pub fn exact_secondary<R: NamedRecord>(
    _primary: &str,
    secondary: Option<&str>,
    reference: &[R],
    _config: &MatcherConfig,
) -> Option<MatchResult> {
    let needle = secondary.map(str::trim).filter(|s| !s.is_empty())?;
    let needle = needle.to_lowercase();
    reference
        .iter()
        .find(|r| {
            r.secondary_name()
                .map(|s| s.trim().to_lowercase() == needle)
                .unwrap_or(false)
        })
        .map(|r| MatchResult::matched(r.record_id(), MatchTier::ExactSecondary))
}

/// Tier 3: equality of fully normalized primary names.
pub fn normalized_exact<R: NamedRecord>(
    primary: &str,
    _secondary: Option<&str>,
    reference: &[R],
    config: &MatcherConfig,
) -> Option<MatchResult> {
    let needle = config.normalizer.normalize(primary);
    if needle.is_empty() {
        return None;
    }
    reference
        .iter()
        .find(|r| config.normalizer.normalize(r.primary_name()) == needle)
        .map(|r| MatchResult::matched(r.record_id(), MatchTier::NormalizedExact))
}

/// Tier 4: diacritic-folded names equal once the variant marker is
/// prepended to whichever side lacks it. Handles sources that disagree on
/// the marker when the normalizer is configured to keep it.
pub fn prefix_variant<R: NamedRecord>(
    primary: &str,
    _secondary: Option<&str>,
    reference: &[R],
    config: &MatcherConfig,
) -> Option<MatchResult> {
    let folded = config
        .normalizer
        .fold_diacritics(&primary.trim().to_lowercase());
    if folded.is_empty() {
        return None;
    }
    let marker = normalize::DEFAULT_VARIANT_MARKER;
    reference
        .iter()
        .find(|r| {
            let candidate_ref = config
                .normalizer
                .fold_diacritics(&r.primary_name().trim().to_lowercase());
            !candidate_ref.is_empty()
                && (folded == format!("{marker} {candidate_ref}")
                    || candidate_ref == format!("{marker} {folded}"))
        })
        .map(|r| MatchResult::matched(r.record_id(), MatchTier::PrefixVariant))
}
