// src/models/matching.rs - Match outcomes and the merge operations they produce

use serde::{Deserialize, Serialize};

/// Which matching strategy succeeded. Diagnostic only: callers must not
/// branch on the tier, but it is logged and surfaced for tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactPrimary,
    ExactSecondary,
    NormalizedExact,
    PrefixVariant,
    FuzzyThreshold,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::ExactPrimary => "exact_primary",
            MatchTier::ExactSecondary => "exact_secondary",
            MatchTier::NormalizedExact => "normalized_exact",
            MatchTier::PrefixVariant => "prefix_variant",
            MatchTier::FuzzyThreshold => "fuzzy_threshold",
        }
    }
}

/// Outcome of matching one candidate against a reference set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchResult {
    Matched { id: String, tier: MatchTier },
    Unmatched,
}

impl MatchResult {
    pub fn matched(id: impl Into<String>, tier: MatchTier) -> Self {
        MatchResult::Matched { id: id.into(), tier }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

/// A single persistence operation. The resolver decides, the store applies.
/// `F` is the per-kind patch type carrying only the fields to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MergeOperation<F> {
    Create { id: String, slug: String, fields: F },
    Update { id: String, fields: F },
}

impl<F> MergeOperation<F> {
    pub fn record_id(&self) -> &str {
        match self {
            MergeOperation::Create { id, .. } | MergeOperation::Update { id, .. } => id,
        }
    }
}
