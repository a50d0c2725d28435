//! Crop identities and advisory tips
//!
//! The classifier was trained on integer labels 1..=22. This module holds the
//! fixed label <-> name mapping and the short growing tip shown with each
//! prediction.

use rustc_hash::FxHashMap;

/// Returned for any label outside 1..=22
pub const UNKNOWN_CROP: &str = "Unknown";

/// Returned when a crop has no tip
pub const DEFAULT_TIP: &str = "No tip available.";

/// Crop names indexed by `label - 1`
pub const CROP_NAMES: [&str; 22] = [
    "rice",
    "maize",
    "chickpea",
    "kidneybeans",
    "pigeonpeas",
    "mothbeans",
    "mungbean",
    "blackgram",
    "lentil",
    "pomegranate",
    "banana",
    "mango",
    "grapes",
    "watermelon",
    "muskmelon",
    "apple",
    "orange",
    "papaya",
    "coconut",
    "cotton",
    "jute",
    "coffee",
];

const TIPS: [(&str, &str); 22] = [
    ("rice", "🌾 Needs heavy rainfall & humid conditions."),
    ("maize", "🌽 Prefers well-drained loamy soil and moderate rainfall."),
    ("chickpea", "🫘 Grows best in cool, dry weather with little irrigation."),
    ("kidneybeans", "🫘 Needs well-drained soil and regular, light watering."),
    ("pigeonpeas", "🌱 Drought tolerant; avoid waterlogged fields."),
    ("mothbeans", "🌵 Thrives in hot, arid conditions and sandy soil."),
    ("mungbean", "🌱 Short season crop; warm weather and light irrigation."),
    ("blackgram", "🌱 Warm, humid climate with well-drained soil."),
    ("lentil", "🌿 Cool season crop; tolerates poor soils but not waterlogging."),
    ("pomegranate", "🍎 Hot, dry summers; tolerates slightly alkaline soil."),
    ("banana", "🍌 Needs rich soil, high humidity and steady watering."),
    ("mango", "🥭 Warm climate with a dry spell before flowering."),
    ("grapes", "🍇 Needs full sun, good drainage and dry harvest weather."),
    ("watermelon", "🍉 Sandy loam, full sun and warm nights."),
    ("muskmelon", "🍈 Warm, dry weather and light, well-drained soil."),
    ("apple", "🍏 Needs winter chill and well-drained loam."),
    ("orange", "🍊 Subtropical climate; avoid frost and waterlogging."),
    ("papaya", "🌴 Frost-free, warm and humid; keep roots well drained."),
    ("coconut", "🥥 Coastal humid tropics with sandy soil."),
    ("cotton", "☁️ Long warm season and black cotton soil."),
    ("jute", "🧵 Hot, humid climate with standing water at sowing."),
    ("coffee", "☕ Shade, steady rainfall and slightly acidic soil."),
];

/// Bidirectional crop label mapping plus advisory tips
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    code_by_name: FxHashMap<&'static str, i64>,
    tips: FxHashMap<&'static str, &'static str>,
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CropCatalog {
    pub fn new() -> Self {
        let code_by_name = CROP_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx as i64 + 1))
            .collect();
        let tips = TIPS.iter().copied().collect();

        Self { code_by_name, tips }
    }

    /// Crop name for a classifier label, or "Unknown"
    pub fn name_for(&self, label: i64) -> &'static str {
        if (1..=CROP_NAMES.len() as i64).contains(&label) {
            CROP_NAMES[(label - 1) as usize]
        } else {
            UNKNOWN_CROP
        }
    }

    /// Classifier label for a crop name (exact, lowercase)
    pub fn code_for(&self, name: &str) -> Option<i64> {
        self.code_by_name.get(name).copied()
    }

    /// Advisory tip for a crop name, falling back to the default text
    pub fn tip_for(&self, name: &str) -> &'static str {
        self.tips.get(name).copied().unwrap_or(DEFAULT_TIP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_bijective() {
        let catalog = CropCatalog::new();
        for label in 1..=22 {
            let name = catalog.name_for(label);
            assert_ne!(name, UNKNOWN_CROP);
            assert_eq!(catalog.code_for(name), Some(label));
        }
        let mut names = CROP_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 22);
    }

    #[test]
    fn test_unmapped_label_is_unknown() {
        let catalog = CropCatalog::new();
        assert_eq!(catalog.name_for(0), UNKNOWN_CROP);
        assert_eq!(catalog.name_for(23), UNKNOWN_CROP);
        assert_eq!(catalog.name_for(-4), UNKNOWN_CROP);
        assert_eq!(catalog.code_for("wheat"), None);
    }

    #[test]
    fn test_tips() {
        let catalog = CropCatalog::new();
        assert_eq!(catalog.tip_for("rice"), "🌾 Needs heavy rainfall & humid conditions.");
        assert_eq!(catalog.tip_for(UNKNOWN_CROP), DEFAULT_TIP);
        for name in CROP_NAMES {
            assert_ne!(catalog.tip_for(name), DEFAULT_TIP, "missing tip for {}", name);
        }
    }
}
