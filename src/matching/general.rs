// src/matching/general.rs - Matching extracted generals against canonical generals

use crate::models::general::{GeneralCandidate, GeneralRecord};
use crate::models::matching::MatchResult;

use super::{exact_primary, exact_secondary, normalized_exact, prefix_variant};
use super::{run_tiers, MatcherConfig, Tier};

/// Find the canonical general a candidate refers to, or `Unmatched`.
///
/// Generals match on names only: exact, then exact on the Chinese name,
/// then normalized, then variant-marker handling. No fuzzy tier - general
/// names are short and the roster is dense, so similarity scoring produces
/// more false merges than it rescues.
pub fn find_matching_general(
    candidate: &GeneralCandidate,
    reference: &[GeneralRecord],
    config: &MatcherConfig,
) -> MatchResult {
    const TIERS: &[Tier<GeneralRecord>] = &[
        exact_primary,
        exact_secondary,
        normalized_exact,
        prefix_variant,
    ];
    run_tiers(
        &candidate.name.vi,
        candidate.name.cn.as_deref(),
        reference,
        config,
        TIERS,
    )
}
