//! Crop rotation recommender
//!
//! Looks up soil-restoration advice for the crop that was just harvested.
//! The dataset is a static CSV with one row per (harvested crop, suggestion);
//! rows are returned verbatim.
//!
//! Matching (on normalized names):
//! 1. Substring pass: rows whose harvested name contains the query or is
//!    contained in it
//! 2. Fuzzy pass (only when 1 finds nothing): the best 3 per-row harvested
//!    names with similarity >= 0.6, expanded back to every row carrying one
//!    of them
//!
//! Rows are always returned in dataset order. Several rows may share a
//! harvested name; each row competes for a fuzzy slot on its own, so a
//! frequent name can take all three, and the fuzzy pass returns every row
//! carrying a winning name.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::{close_matches, normalize_crop_name};

/// Column holding the harvested crop name (matched case-insensitively)
pub const HARVESTED_COLUMN: &str = "harvested";

/// Minimum similarity for the fuzzy pass
pub const FUZZY_CUTOFF: f64 = 0.6;

/// Number of per-row fuzzy candidates the fuzzy pass keeps
pub const FUZZY_MAX_NAMES: usize = 3;

/// One dataset row, column name -> cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationRecord(pub Map<String, Value>);

impl RotationRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_str)
    }
}

/// Immutable rotation dataset with a name index
pub struct RotationTable {
    records: Vec<RotationRecord>,
    /// Normalized harvested name per record
    names: Vec<String>,
    /// Normalized harvested name -> record indices (ascending)
    rows_by_name: FxHashMap<String, Vec<usize>>,
}

impl RotationTable {
    /// Index records; the harvested column is found on the first record
    pub fn new(records: Vec<RotationRecord>) -> Result<Self> {
        let harvested_key = match records.first() {
            Some(first) => Some(
                find_harvested_column(first.0.keys().map(String::as_str))
                    .with_context(|| format!("Rotation data has no '{}' column", HARVESTED_COLUMN))?
                    .to_string(),
            ),
            None => None,
        };

        let names: Vec<String> = records
            .iter()
            .map(|record| {
                harvested_key
                    .as_deref()
                    .and_then(|key| record.get(key))
                    .map(normalize_crop_name)
                    .unwrap_or_default()
            })
            .collect();

        let mut rows_by_name: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (idx, name) in names.iter().enumerate() {
            if !name.is_empty() {
                rows_by_name.entry(name.clone()).or_default().push(idx);
            }
        }

        Ok(Self {
            records,
            names,
            rows_by_name,
        })
    }

    /// Load the dataset from CSV; every column is read as text
    pub fn load_csv(path: &Path) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load rotation CSV: {:?}", path))?;

        let table = Self::from_dataframe(&df)?;
        tracing::info!(
            "Loaded {} rotation records ({} distinct crops)",
            table.len(),
            table.rows_by_name.len()
        );
        Ok(table)
    }

    /// Convert a text-typed DataFrame into records; nulls become ""
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let header: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        find_harvested_column(header.iter().map(String::as_str))
            .with_context(|| format!("Rotation data has no '{}' column", HARVESTED_COLUMN))?;

        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                col.str()
                    .with_context(|| format!("Column '{}' is not string type", col.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        let records = (0..df.height())
            .map(|row| {
                let fields = header
                    .iter()
                    .zip(&columns)
                    .map(|(name, values)| {
                        let cell = values.get(row).unwrap_or("");
                        (name.clone(), Value::String(cell.to_string()))
                    })
                    .collect();
                RotationRecord(fields)
            })
            .collect();

        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows matching a free-text crop name, in dataset order
    ///
    /// Empty or garbage input yields an empty result, never an error.
    pub fn recommend(&self, last_crop: &str) -> Vec<&RotationRecord> {
        let query = normalize_crop_name(last_crop);
        if query.is_empty() {
            return Vec::new();
        }

        let by_substring: Vec<&RotationRecord> = self
            .records
            .iter()
            .zip(&self.names)
            .filter(|(_, name)| {
                !name.is_empty() && (query.contains(name.as_str()) || name.contains(query.as_str()))
            })
            .map(|(record, _)| record)
            .collect();

        if !by_substring.is_empty() {
            return by_substring;
        }

        let mut matched = close_matches(
            &query,
            self.names.iter().map(String::as_str).filter(|n| !n.is_empty()),
            FUZZY_MAX_NAMES,
            FUZZY_CUTOFF,
        );
        matched.sort_unstable();
        matched.dedup();
        if !matched.is_empty() {
            tracing::debug!("Fuzzy rotation match for '{}': {:?}", query, matched);
        }

        let mut rows: Vec<usize> = matched
            .iter()
            .filter_map(|name| self.rows_by_name.get(*name))
            .flatten()
            .copied()
            .collect();
        rows.sort_unstable();

        rows.into_iter().map(|idx| &self.records[idx]).collect()
    }
}

fn find_harvested_column<'a>(mut columns: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    columns.find(|name| name.trim().eq_ignore_ascii_case(HARVESTED_COLUMN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(harvested: &str, recommended: &str) -> RotationRecord {
        let value = json!({
            "harvested": harvested,
            "deficiency": "Nitrogen",
            "recommended_crop": recommended,
        });
        match value {
            Value::Object(map) => RotationRecord(map),
            _ => unreachable!(),
        }
    }

    fn table() -> RotationTable {
        RotationTable::new(vec![
            record("Rice", "Green gram"),
            record("Wheat", "Soybean"),
            record("Maize", "Chickpea"),
            record("Wheat", "Mustard"),
            record("Sugarcane", "Cowpea"),
        ])
        .unwrap()
    }

    fn recommended(rows: &[&RotationRecord]) -> Vec<String> {
        rows.iter()
            .map(|r| r.get("recommended_crop").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_query_containing_name_matches() {
        let t = table();
        let rows = t.recommend("ricecultivation");
        assert_eq!(recommended(&rows), vec!["Green gram"]);
    }

    #[test]
    fn test_name_containing_query_matches() {
        let t = table();
        let rows = t.recommend("cane");
        assert_eq!(recommended(&rows), vec!["Cowpea"]);
    }

    #[test]
    fn test_substring_pass_returns_all_rows_in_order() {
        let t = table();
        let rows = t.recommend("  WHEAT!! ");
        assert_eq!(recommended(&rows), vec!["Soybean", "Mustard"]);
    }

    #[test]
    fn test_fuzzy_fallback() {
        // "maiz" is a substring of "maize"; "miaze" is not
        let t = table();
        let rows = t.recommend("miaze");
        assert_eq!(recommended(&rows), vec!["Chickpea"]);
    }

    #[test]
    fn test_fuzzy_fallback_expands_duplicate_names() {
        let t = table();
        let rows = t.recommend("wheet");
        assert_eq!(recommended(&rows), vec!["Soybean", "Mustard"]);
    }

    #[test]
    fn test_fuzzy_slots_filled_per_row() {
        // "wheat" scores 0.8 and "heat" 2/3; three wheat rows take every slot
        let t = RotationTable::new(vec![
            record("Wheat", "a"),
            record("Wheat", "b"),
            record("Heat", "d"),
            record("Wheat", "c"),
        ])
        .unwrap();
        assert_eq!(recommended(&t.recommend("wheet")), vec!["a", "b", "c"]);

        // with a single wheat row the weaker name gets a slot
        let t = RotationTable::new(vec![record("Wheat", "a"), record("Heat", "d")]).unwrap();
        assert_eq!(recommended(&t.recommend("wheet")), vec!["a", "d"]);
    }

    #[test]
    fn test_no_match_and_empty_input() {
        let t = table();
        assert!(t.recommend("zzzzzz").is_empty());
        assert!(t.recommend("").is_empty());
        assert!(t.recommend("  ?!  ").is_empty());
    }

    #[test]
    fn test_blank_harvested_rows_never_match() {
        let t = RotationTable::new(vec![record("", "Anything"), record("Rice", "Green gram")])
            .unwrap();
        assert_eq!(recommended(&t.recommend("barley")), Vec::<String>::new());
        assert_eq!(recommended(&t.recommend("rice")), vec!["Green gram"]);
    }

    #[test]
    fn test_missing_harvested_column_rejected() {
        let value = json!({ "crop": "Rice" });
        let Value::Object(map) = value else { unreachable!() };
        assert!(RotationTable::new(vec![RotationRecord(map)]).is_err());
    }

    #[test]
    fn test_load_csv_keeps_columns_verbatim() {
        let path = std::env::temp_dir().join(format!("rotation_{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "Harvested,deficiency,recommended_crop\nRice,Nitrogen,Green gram\nWheat,,Soybean\n",
        )
        .unwrap();

        let t = RotationTable::load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(t.len(), 2);
        assert!(!t.is_empty());
        let rows = t.recommend("wheat");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Harvested"), Some("Wheat"));
        assert_eq!(rows[0].get("deficiency"), Some(""));

        let keys: Vec<&String> = rows[0].0.keys().collect();
        assert_eq!(keys, vec!["Harvested", "deficiency", "recommended_crop"]);
    }
}
