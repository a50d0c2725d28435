//! Crop name normalization
//!
//! Free-text crop names arrive as "Rice (paddy)", "  WHEAT ", "sugar-cane".
//! Both the query and the dataset's harvested column go through the same
//! normalization before any comparison.

/// Normalize a crop name for matching
///
/// 1. Lowercase ASCII letters
/// 2. Keep ASCII letters, digits and whitespace; drop everything else
/// 3. Collapse whitespace runs to a single space and trim
///
/// Idempotent: `normalize_crop_name(&normalize_crop_name(s)) == normalize_crop_name(s)`.
pub fn normalize_crop_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
