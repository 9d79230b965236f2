//! Dataset validation.
//!
//! Normalization never rejects input, so problems that are worth telling
//! the author about are reported here as warnings instead.

use std::collections::HashSet;

use serde_json::Value;

use crate::model::Dataset;
use crate::normalizer::derive_id;

/// A warning from dataset validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The unit ID (if applicable).
    pub unit_id: Option<i64>,
    /// Warning message.
    pub message: String,
}

/// Validate a dataset for common authoring issues.
pub fn validate_dataset(data: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if data.units.is_empty() {
        warnings.push(ValidationWarning {
            unit_id: None,
            message: "dataset has no units".into(),
        });
        return warnings;
    }

    // Only the first unit with a given id can be selected
    let mut seen_ids = HashSet::new();
    for unit in &data.units {
        if !seen_ids.insert(unit.id) {
            warnings.push(ValidationWarning {
                unit_id: Some(unit.id),
                message: format!(
                    "duplicate unit ID: {} (\"{}\" is unreachable)",
                    unit.id, unit.title
                ),
            });
        }
    }

    for unit in &data.units {
        if unit.words.is_empty() {
            warnings.push(ValidationWarning {
                unit_id: Some(unit.id),
                message: "unit has no words".into(),
            });
        }
    }

    for unit in &data.units {
        let missing = unit
            .words
            .iter()
            .filter(|w| w.definition.trim().is_empty())
            .count();
        if missing > 0 {
            warnings.push(ValidationWarning {
                unit_id: Some(unit.id),
                message: format!("{missing} word(s) without a definition"),
            });
        }
    }

    warnings
}

/// Check declared ids in the raw document that normalization has to bend.
///
/// Fractional ids are truncated, so `2.5` silently becomes unit `2`.
pub fn validate_document(raw: &Value) -> Vec<ValidationWarning> {
    let Some(entries) = raw.get("units").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let declared = entry.get("id")?;
            let Value::Number(n) = declared else {
                return None;
            };
            if n.as_f64().is_some_and(|f| f.fract() == 0.0) {
                return None;
            }
            let id = derive_id(Some(declared), index);
            Some(ValidationWarning {
                unit_id: Some(id),
                message: format!("unit ID {n} is not an integer; truncated to {id}"),
            })
        })
        .collect()
}
