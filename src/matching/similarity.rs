// src/matching/similarity.rs - String similarity scoring

use strsim::normalized_levenshtein;

/// Character-level edit-similarity ratio in `[0.0, 1.0]`.
///
/// Symmetric, `1.0` for identical strings, and monotonic with respect to
/// shared content. Two empty strings score `1.0`; callers normalize and
/// guard empty names before scoring, so the degenerate case never decides
/// a match on its own.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}
