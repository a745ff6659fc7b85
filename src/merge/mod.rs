// src/merge/mod.rs - Deciding which persistence operation a match outcome becomes

pub mod general;
pub mod skill;

pub use general::resolve_general;
pub use skill::resolve_skill;

use std::collections::HashSet;

use crate::models::NamePair;

/// Where a freshly created record gets its stable id from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewIdSource {
    /// The Vietnamese display name (default).
    #[default]
    PrimaryName,
    /// The Chinese name when present, falling back to the primary name.
    SecondaryName,
}

pub(crate) fn new_record_id(name: &NamePair, source: NewIdSource) -> String {
    match source {
        NewIdSource::PrimaryName => name.vi.clone(),
        NewIdSource::SecondaryName => name.cn.clone().unwrap_or_else(|| name.vi.clone()),
    }
}

/// Tracks every slug in use so new records get a unique one. Seeded with
/// the canonical set's slugs and grows as a batch creates records, so two
/// in-batch creates cannot collide either.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub fn from_existing<I>(slugs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            used: slugs.into_iter().map(Into::into).collect(),
        }
    }

    /// Claim `base` if free, otherwise the lowest `base-N` with N >= 2.
    pub fn claim(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
