//! String normalization shared by indexing, search, and highlighting.

/// Normalize a term for the index vocabulary: strip diacritics, then lowercase.
///
/// Folding diacritics lets ASCII queries reach accented vocabulary and keeps
/// edit distances between accented and plain spellings small:
/// - "Café" → "cafe"
/// - "naïve" → "naive"
/// - "MÜNCHEN" → "munchen"
///
/// Index terms, query tokens, and highlight lookups all pass through this
/// function, so the three stay in agreement about what a term looks like.
#[cfg(feature = "unicode-normalization")]
pub fn normalize(value: &str) -> String {
    use unicode_normalization::char::is_combining_mark;
    use unicode_normalization::UnicodeNormalization;

    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Lightweight normalization without the `unicode-normalization` feature:
/// lowercase only. Accented text is still searchable, but only by spelling
/// the accents out.
#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}
