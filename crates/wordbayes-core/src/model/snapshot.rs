//! Serializable classifier snapshot
//!
//! JSON shape:
//!
//! ```text
//! { "vocabulary": ["buy", ...],
//!   "categories": [ { "name": "spam", "wordsFrequency": {"buy": 1}, "documentsCount": 1 } ] }
//! ```
//!
//! The tokenizer is never part of a snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whole-classifier snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierData {
    #[serde(default)]
    pub vocabulary: Vec<String>,
    #[serde(default)]
    pub categories: Vec<CategoryData>,
}

/// Single category snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    pub name: String,
    #[serde(default)]
    pub words_frequency: BTreeMap<String, u64>,
    #[serde(default)]
    pub documents_count: u64,
}

impl CategoryData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
