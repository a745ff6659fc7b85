// src/merge/skill.rs - Merge resolution for skill candidates

use crate::matching::MatcherConfig;
use crate::models::matching::{MatchResult, MergeOperation};
use crate::models::skill::{SkillCandidate, SkillPatch};

use super::{new_record_id, NewIdSource, SlugRegistry};

/// Skill counterpart of [`super::resolve_general`]; same decision shape.
pub fn resolve_skill(
    candidate: &SkillCandidate,
    match_result: MatchResult,
    config: &MatcherConfig,
    slugs: &mut SlugRegistry,
    id_source: NewIdSource,
) -> MergeOperation<SkillPatch> {
    let mut fields = candidate.to_patch();
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
