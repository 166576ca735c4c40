use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Verdict;

/// Summary used when an update produced no narrative.
pub const DEFAULT_EVOLUTION_SUMMARY: &str = "Actualización manual";

/// Old or new value of a tracked field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<ChangeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<ChangeValue>,
    pub comment: String,
}

/// One audit-trail record. Immutable once in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionEntry {
    /// Local clock at the time of the update, never taken from the model.
    pub date: DateTime<Utc>,
    pub source_document: String,
    pub summary: String,
    #[serde(default)]
    pub changes: Vec<FieldChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency_verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency_rationale: Option<String>,
}

impl EvolutionEntry {
    pub fn new(date: DateTime<Utc>, source_document: &str, summary: &str) -> Self {
        Self {
            date,
            source_document: source_document.to_string(),
            summary: summary.to_string(),
            changes: Vec::new(),
            efficiency_verdict: None,
            efficiency_rationale: None,
        }
    }
}
