// src/merge/general.rs - Merge resolution for general candidates

use crate::matching::MatcherConfig;
use crate::models::general::{GeneralCandidate, GeneralPatch};
use crate::models::matching::{MatchResult, MergeOperation};

use super::{new_record_id, NewIdSource, SlugRegistry};

/// Turn a match outcome into the operation the store should apply.
///
/// Matched candidates become updates carrying only their non-null fields.
/// Unmatched candidates become creates: id from the configured name, slug
/// derived from the Vietnamese name and deduplicated through the registry.
/// Pure decision - nothing is written here.
pub fn resolve_general(
    candidate: &GeneralCandidate,
    match_result: MatchResult,
    innate_skill_id: Option<String>,
    config: &MatcherConfig,
    slugs: &mut SlugRegistry,
    id_source: NewIdSource,
) -> MergeOperation<GeneralPatch> {
    let mut fields = candidate.to_patch(innate_skill_id);
    match match_result {
        MatchResult::Matched { id, .. } => MergeOperation::Update { id, fields },
        MatchResult::Unmatched => {
            fields.name_vi = Some(candidate.name.vi.clone());
            let id = new_record_id(&candidate.name, id_source);
            let slug = slugs.claim(&config.normalizer.slugify(&candidate.name.vi));
            MergeOperation::Create { id, slug, fields }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::general::StatBlock;
    use crate::models::matching::MatchTier;
    use crate::models::NamePair;

    fn candidate(vi: &str, cn: Option<&str>) -> GeneralCandidate {
        GeneralCandidate {
            name: NamePair::new(vi, cn.map(Into::into)),
            ..Default::default()
        }
    }

    #[test]
    fn matched_candidate_becomes_update() {
        let mut cand = candidate("Tuấn Úc", None);
        cand.cost = Some(5);
        cand.base_stats = Some(StatBlock {
            attack: Some(72.0),
            ..Default::default()
        });
        let config = MatcherConfig::default();
        let mut slugs = SlugRegistry::default();
        let op = resolve_general(
            &cand,
            MatchResult::matched("1", MatchTier::ExactPrimary),
            Some("skill-7".into()),
            &config,
            &mut slugs,
            NewIdSource::PrimaryName,
        );
        match op {
            MergeOperation::Update { id, fields } => {
                assert_eq!(id, "1");
                assert_eq!(fields.cost, Some(5));
                assert_eq!(fields.innate_skill_id.as_deref(), Some("skill-7"));
                // Updates never rename.
                assert_eq!(fields.name_vi, None);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_candidate_becomes_create_with_slug() {
        let cand = candidate("Tuấn Úc", Some("荀彧"));
        let config = MatcherConfig::default();
        let mut slugs = SlugRegistry::default();
        let op = resolve_general(
            &cand,
            MatchResult::Unmatched,
            None,
            &config,
            &mut slugs,
            NewIdSource::PrimaryName,
        );
        match op {
            MergeOperation::Create { id, slug, fields } => {
                assert_eq!(id, "Tuấn Úc");
                assert_eq!(slug, "tuan-uc");
                assert_eq!(fields.name_vi.as_deref(), Some("Tuấn Úc"));
                assert_eq!(fields.name_cn.as_deref(), Some("荀彧"));
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn secondary_id_source_uses_chinese_name() {
        let cand = candidate("Tuấn Úc", Some("荀彧"));
        let config = MatcherConfig::default();
        let mut slugs = SlugRegistry::default();
        let op = resolve_general(
            &cand,
            MatchResult::Unmatched,
            None,
            &config,
            &mut slugs,
            NewIdSource::SecondaryName,
        );
        assert_eq!(op.record_id(), "荀彧");
    }

    #[test]
    fn colliding_slugs_get_suffixes() {
        let config = MatcherConfig::default();
        let mut slugs = SlugRegistry::default();
        let first = resolve_general(
            &candidate("Điển Vi", None),
            MatchResult::Unmatched,
            None,
            &config,
            &mut slugs,
            NewIdSource::PrimaryName,
        );
        let second = resolve_general(
            &candidate("Điển Vi", None),
            MatchResult::Unmatched,
            None,
            &config,
            &mut slugs,
            NewIdSource::PrimaryName,
        );
        let slug_of = |op: &MergeOperation<GeneralPatch>| match op {
            MergeOperation::Create { slug, .. } => slug.clone(),
            _ => panic!("expected create"),
        };
        assert_eq!(slug_of(&first), "dien-vi");
        assert_eq!(slug_of(&second), "dien-vi-2");
    }
}
