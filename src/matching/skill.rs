// src/matching/skill.rs - Matching skills, including the fuzzy-threshold tiers

use log::debug;

use crate::models::matching::{MatchResult, MatchTier};
use crate::models::skill::{SkillCandidate, SkillRecord};

use super::similarity::similarity;
use super::{exact_primary, exact_secondary, normalized_exact, prefix_variant};
use super::{run_tiers, MatcherConfig, Tier};

/// Find the canonical skill a candidate refers to, or `Unmatched`.
///
/// Skills run the same name tiers as generals plus a fuzzy tail: skill
/// names are long multi-word phrases, so transliteration variants land
/// close but rarely identical. Scores at or above the fuzzy threshold win
/// outright; between the fallback and fuzzy thresholds a match needs a
/// corroborating type or quality agreement.
pub fn find_matching_skill(
    candidate: &SkillCandidate,
    reference: &[SkillRecord],
    config: &MatcherConfig,
) -> MatchResult {
    const TIERS: &[Tier<SkillRecord>] = &[
        exact_primary,
        exact_secondary,
        normalized_exact,
        prefix_variant,
    ];
    let result = run_tiers(
        &candidate.name.vi,
        candidate.name.cn.as_deref(),
        reference,
        config,
        TIERS,
    );
    if result.is_matched() || candidate.name.vi.trim().is_empty() {
        return result;
    }
    fuzzy_threshold(candidate, reference, config)
}

/// Tier 5. Strict `>` on the running best keeps the first reference at any
/// tied score, so results depend only on reference order.
fn fuzzy_threshold(
    candidate: &SkillCandidate,
    reference: &[SkillRecord],
    config: &MatcherConfig,
) -> MatchResult {
    let needle = config.normalizer.normalize(&candidate.name.vi);
    if needle.is_empty() {
        return MatchResult::Unmatched;
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, record) in reference.iter().enumerate() {
        let ratio = similarity(&needle, &config.normalizer.normalize(&record.name_vi));
        if ratio >= config.fuzzy_threshold && best.map_or(true, |(_, b)| ratio > b) {
            best = Some((idx, ratio));
        }
    }

    if best.is_none() {
        // Rescue pass: lower bar, but type or quality must corroborate.
        let mut best_ratio = 0.0;
        for (idx, record) in reference.iter().enumerate() {
            let ratio = similarity(&needle, &config.normalizer.normalize(&record.name_vi));
            if ratio >= config.fallback_threshold
                && ratio > best_ratio
                && aux_attribute_agrees(candidate, record)
            {
                best_ratio = ratio;
                best = Some((idx, ratio));
            }
        }
    }

    match best {
        Some((idx, ratio)) => {
            let record = &reference[idx];
            debug!(
                "fuzzy skill match: '{}' -> '{}' (id={}, ratio={:.3})",
                candidate.name.vi, record.name_vi, record.id, ratio
            );
            MatchResult::matched(record.id.as_str(), MatchTier::FuzzyThreshold)
        }
        None => MatchResult::Unmatched,
    }
}

fn aux_attribute_agrees(candidate: &SkillCandidate, record: &SkillRecord) -> bool {
    let type_match = match (&candidate.type_id, &record.type_id) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    };
    let quality_match = match (&candidate.quality, &record.quality) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    };
    type_match || quality_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamePair;

    fn record(id: &str, vi: &str, type_id: Option<&str>, quality: Option<&str>) -> SkillRecord {
        SkillRecord {
            id: id.into(),
            name_vi: vi.into(),
            name_cn: None,
            slug: String::new(),
            type_id: type_id.map(Into::into),
            quality: quality.map(Into::into),
            trigger_rate: None,
            source_type: None,
            effect_cn: None,
            effect_vi: None,
            wiki_url: None,
            associated_generals: Vec::new(),
            updated_at: None,
        }
    }

    fn candidate(vi: &str, type_id: Option<&str>, quality: Option<&str>) -> SkillCandidate {
        SkillCandidate {
            name: NamePair::new(vi, None),
            type_id: type_id.map(Into::into),
            quality: quality.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn exact_tiers_run_before_fuzzy() {
        let reference = vec![record("1", "Thần Cơ Mạc Trắc", None, None)];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(&candidate("thần cơ mạc trắc", None, None), &reference, &config),
            MatchResult::matched("1", MatchTier::ExactPrimary)
        );
    }

    #[test]
    fn high_similarity_matches_without_corroboration() {
        // "phong vu a" vs "phong vu b": one edit over ten chars, ratio 0.90.
        let reference = vec![record("1", "phong vu b", None, None)];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(&candidate("phong vu a", None, None), &reference, &config),
            MatchResult::matched("1", MatchTier::FuzzyThreshold)
        );
    }

    #[test]
    fn sub_threshold_needs_type_or_quality_agreement() {
        // "phong vu" vs "phong va": ratio 0.875, below the fuzzy threshold.
        let reference = vec![record("1", "phong va", Some("command"), None)];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(&candidate("phong vu", None, None), &reference, &config),
            MatchResult::Unmatched
        );
        assert_eq!(
            find_matching_skill(
                &candidate("phong vu", Some("command"), None),
                &reference,
                &config
            ),
            MatchResult::matched("1", MatchTier::FuzzyThreshold)
        );
    }

    #[test]
    fn quality_agreement_also_rescues() {
        let reference = vec![record("1", "phong va", None, Some("S"))];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(&candidate("phong vu", None, Some("s")), &reference, &config),
            MatchResult::matched("1", MatchTier::FuzzyThreshold)
        );
    }

    #[test]
    fn transliteration_variant_rescued_by_type() {
        // Normalized similarity of these two is ~0.81: below the fuzzy
        // threshold, inside the fallback band.
        let reference = vec![record("7", "Thần Cơ Mạc Đoán", Some("command"), None)];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(
                &candidate("Thần Cơ Mạc Trắc", Some("command"), None),
                &reference,
                &config
            ),
            MatchResult::matched("7", MatchTier::FuzzyThreshold)
        );
        assert_eq!(
            find_matching_skill(&candidate("Thần Cơ Mạc Trắc", None, None), &reference, &config),
            MatchResult::Unmatched
        );
    }

    #[test]
    fn far_names_never_match_even_with_agreement() {
        let reference = vec![record("1", "Loạn Thế Gian Hùng", Some("command"), Some("S"))];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(
                &candidate("Vạn Tiễn Tề Phát", Some("command"), Some("S")),
                &reference,
                &config
            ),
            MatchResult::Unmatched
        );
    }

    #[test]
    fn tied_scores_keep_the_first_reference() {
        let reference = vec![
            record("1", "phong vu b", None, None),
            record("2", "phong vu c", None, None),
        ];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(&candidate("phong vu a", None, None), &reference, &config),
            MatchResult::matched("1", MatchTier::FuzzyThreshold)
        );
    }

    #[test]
    fn empty_name_is_unmatched() {
        let reference = vec![record("1", "phong vu", None, None)];
        let config = MatcherConfig::default();
        assert_eq!(
            find_matching_skill(&candidate("", Some("command"), None), &reference, &config),
            MatchResult::Unmatched
        );
    }
}
