// src/matching/normalize.rs - Name normalization for loose comparison

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Literal diacritic-folding table covering the full Vietnamese lowercase
/// alphabet. Deliberately not Unicode decomposition: the table is total for
/// the alphabet in use and nothing else.
pub const VIETNAMESE_DIACRITICS: &[(char, char)] = &[
    ('à', 'a'), ('á', 'a'), ('ả', 'a'), ('ã', 'a'), ('ạ', 'a'),
    ('ă', 'a'), ('ằ', 'a'), ('ắ', 'a'), ('ẳ', 'a'), ('ẵ', 'a'), ('ặ', 'a'),
    ('â', 'a'), ('ầ', 'a'), ('ấ', 'a'), ('ẩ', 'a'), ('ẫ', 'a'), ('ậ', 'a'),
    ('đ', 'd'),
    ('è', 'e'), ('é', 'e'), ('ẻ', 'e'), ('ẽ', 'e'), ('ẹ', 'e'),
    ('ê', 'e'), ('ề', 'e'), ('ế', 'e'), ('ể', 'e'), ('ễ', 'e'), ('ệ', 'e'),
    ('ì', 'i'), ('í', 'i'), ('ỉ', 'i'), ('ĩ', 'i'), ('ị', 'i'),
    ('ò', 'o'), ('ó', 'o'), ('ỏ', 'o'), ('õ', 'o'), ('ọ', 'o'),
    ('ô', 'o'), ('ồ', 'o'), ('ố', 'o'), ('ổ', 'o'), ('ỗ', 'o'), ('ộ', 'o'),
    ('ơ', 'o'), ('ờ', 'o'), ('ớ', 'o'), ('ở', 'o'), ('ỡ', 'o'), ('ợ', 'o'),
    ('ù', 'u'), ('ú', 'u'), ('ủ', 'u'), ('ũ', 'u'), ('ụ', 'u'),
    ('ư', 'u'), ('ừ', 'u'), ('ứ', 'u'), ('ử', 'u'), ('ữ', 'u'), ('ự', 'u'),
    ('ỳ', 'y'), ('ý', 'y'), ('ỷ', 'y'), ('ỹ', 'y'), ('ỵ', 'y'),
];

/// Variant marker used by the game for re-released generals ("SP Tuấn Úc").
pub const DEFAULT_VARIANT_MARKER: &str = "sp";

static SLUG_INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static SLUG_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SLUG_HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Reduces names to a diacritic-free, lowercase, marker-stripped form.
/// The folding table and variant marker are injected at construction so the
/// dictionaries stay configuration, not global state.
#[derive(Debug, Clone)]
pub struct Normalizer {
    diacritics: HashMap<char, char>,
    marker: Option<Regex>,
}

impl Normalizer {
    pub fn new(table: &[(char, char)], variant_marker: Option<&str>) -> Self {
        let marker = variant_marker.filter(|m| !m.is_empty()).map(|m| {
            // Marker, then optional separator punctuation. Compiled against
            // already-lowercased input.
            Regex::new(&format!(r"^{}[\s\-_]*", regex::escape(&m.to_lowercase())))
                .expect("variant marker regex must compile")
        });
        Self {
            diacritics: table.iter().copied().collect(),
            marker,
        }
    }

    /// The standard configuration: Vietnamese folding table, "sp" marker.
    pub fn with_defaults() -> Self {
        Self::new(VIETNAMESE_DIACRITICS, Some(DEFAULT_VARIANT_MARKER))
    }

    /// A normalizer that keeps variant markers intact. With this
    /// configuration the prefix-variant matching tier does the marker
    /// handling instead.
    pub fn without_marker() -> Self {
        Self::new(VIETNAMESE_DIACRITICS, None)
    }

    /// Normalize for matching: trim, lowercase, strip the variant marker,
    /// fold diacritics, trim. Total and idempotent for every input; the
    /// marker strip loops so that stacked markers cannot survive one pass.
    pub fn normalize(&self, name: &str) -> String {
        let mut text = name.trim().to_lowercase();
        if let Some(marker) = &self.marker {
            while let Some(found) = marker.find(&text) {
                let end = found.end();
                text = text[end..].to_string();
            }
        }
        self.fold_diacritics(&text).trim().to_string()
    }

    /// Fold diacritic-bearing characters to their base-Latin equivalents.
    /// Characters outside the table pass through unchanged.
    pub fn fold_diacritics(&self, text: &str) -> String {
        text.chars()
            .map(|c| *self.diacritics.get(&c).unwrap_or(&c))
            .collect()
    }

    /// Derive a URL-safe slug: lowercase, fold, drop anything outside
    /// `[a-z0-9 -]`, hyphenate whitespace, collapse hyphen runs.
    pub fn slugify(&self, name: &str) -> String {
        let folded = self.fold_diacritics(&name.trim().to_lowercase());
        let cleaned = SLUG_INVALID.replace_all(&folded, "");
        let hyphenated = SLUG_WHITESPACE.replace_all(&cleaned, "-");
        SLUG_HYPHEN_RUN
            .replace_all(&hyphenated, "-")
            .trim_matches('-')
            .to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
