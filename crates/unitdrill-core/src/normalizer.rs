//! Raw vocabulary normalizer.
//!
//! Turns whatever JSON the data file holds into a canonical [`Dataset`].
//! Normalization is total: malformed values are coerced to text or skipped,
//! and the worst case is an empty dataset.

use serde_json::{Map, Number, Value};

use crate::model::{Dataset, Unit, Word};

/// Field names accepted for a word's term, in order of preference.
pub const TERM_FIELDS: &[&str] = &["w", "word", "term"];

/// Field names accepted for a word's definition, in order of preference.
pub const DEFINITION_FIELDS: &[&str] = &["def", "definition", "meaning"];

/// Normalize a loosely-typed document into a [`Dataset`].
///
/// Units are returned in ascending id order. Units sharing an id keep their
/// input order.
pub fn normalize(raw: &Value) -> Dataset {
    let Some(entries) = raw.get("units").and_then(Value::as_array) else {
        tracing::debug!("document has no `units` array, using empty dataset");
        return Dataset::default();
    };

    let mut units: Vec<Unit> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if entry.is_null() {
                tracing::debug!(position = index + 1, "skipping null unit entry");
                return None;
            }
            Some(normalize_unit(entry, index))
        })
        .collect();

    // `sort_by_key` is stable, so tied ids keep their input order.
    units.sort_by_key(|u| u.id);

    Dataset { units }
}

fn normalize_unit(entry: &Value, index: usize) -> Unit {
    let fields = entry.as_object();

    let id = derive_id(fields.and_then(|f| f.get("id")), index);

    let title = match fields.and_then(|f| f.get("title")) {
        Some(v) if !v.is_null() => coerce_text(v),
        _ => format!("Sentence {id:02}"),
    };

    let words: Vec<Word> = fields
        .and_then(|f| f.get("words"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(normalize_word).collect())
        .unwrap_or_default();

    Unit { id, title, words }
}

fn normalize_word(entry: &Value) -> Option<Word> {
    if entry.is_null() {
        return None;
    }
    let fields = entry.as_object();

    let term = fields
        .and_then(|f| first_present(f, TERM_FIELDS))
        .map(coerce_text)
        .unwrap_or_default();
    if term.is_empty() {
        tracing::debug!("dropping word entry without a term");
        return None;
    }

    let definition = fields
        .and_then(|f| first_present(f, DEFINITION_FIELDS))
        .map(coerce_text)
        .unwrap_or_default();

    Some(Word { term, definition })
}

/// First field among `keys` that is present and not `null`.
fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null())
}

/// Derive a unit id from its declared `id` field, falling back to the
/// 1-based position of the entry.
pub fn derive_id(declared: Option<&Value>, index: usize) -> i64 {
    let position = i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1));

    match declared {
        Some(Value::Number(n)) => number_id(n).unwrap_or(position),
        Some(Value::String(s)) => first_digit_run(s).unwrap_or(position),
        _ => position,
    }
}

fn number_id(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.as_u64().is_some() {
        return Some(i64::MAX);
    }
    // Float-to-int `as` saturates, which is the behaviour we want here.
    n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
}

/// Parse the first run of ASCII digits in `s`, saturating on overflow.
fn first_digit_run(s: &str) -> Option<i64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = &s[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    Some(digits[..end].parse().unwrap_or(i64::MAX))
}

/// Coerce any JSON value to display text.
///
/// Strings pass through, integral numbers print without a fraction, arrays
/// join their elements with commas and objects collapse to a fixed marker.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
