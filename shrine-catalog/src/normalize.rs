//! Response envelope normalization.
//!
//! The content service wraps record arrays in several different envelopes
//! depending on route and vintage. Shapes are tried in a fixed order and
//! the first match wins:
//!
//! 1. `{ "success": true, "data": [...] }` (the flag may be absent; `data`
//!    may itself be an object holding a named collection)
//! 2. `{ "<collection key>": [...] }`
//! 3. `[...]`

use std::collections::HashSet;

use serde_json::{Map, Value};
use shrine_core::CatalogRecord;

use crate::error::{ShapeError, json_kind};

/// Which envelope a payload matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `data` array under an (optional) success flag.
    Flagged,
    /// Named collection key, either top-level or inside `data`.
    Named(String),
    /// The body was the array itself.
    Bare,
}

impl std::fmt::Display for EnvelopeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flagged => write!(f, "success/data envelope"),
            Self::Named(key) => write!(f, "'{key}' collection"),
            Self::Bare => write!(f, "bare array"),
        }
    }
}

/// Records extracted from one response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub records: Vec<CatalogRecord>,
    pub shape: EnvelopeShape,
    /// Objects rejected at record level (missing id, invalid price).
    pub dropped: usize,
    /// Records replaced by a later record with the same id.
    pub duplicates: usize,
}

/// Extract the record collection from a parsed response body.
///
/// Never panics: every way a body can fail to be a catalog is a
/// [`ShapeError`]. Record-level problems do not fail the batch; such
/// records are dropped and counted. Duplicate ids keep the last occurrence.
pub fn normalize<S: AsRef<str>>(
    body: &Value,
    collection_keys: &[S],
) -> Result<Normalized, ShapeError> {
    let (items, shape) = match_envelope(body, collection_keys)?;

    if let Some((index, bad)) = items.iter().enumerate().find(|(_, v)| !v.is_object()) {
        return Err(ShapeError::NotRecordLike {
            index,
            found: json_kind(bad),
        });
    }

    let mut dropped = 0;
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(obj) = item else { continue };
        match CatalogRecord::from_raw(obj.clone()) {
            Some(rec) => records.push(rec),
            None => {
                dropped += 1;
                log::warn!(
                    "Dropping record without a usable id or price: {}",
                    preview(obj)
                );
            }
        }
    }

    let before = records.len();
    let records = dedup_last_wins(records);
    let duplicates = before - records.len();
    if duplicates > 0 {
        log::warn!("Collapsed {} duplicate record id(s)", duplicates);
    }

    log::debug!(
        "Normalized {} record(s) from {} ({} dropped)",
        records.len(),
        shape,
        dropped
    );

    Ok(Normalized {
        records,
        shape,
        dropped,
        duplicates,
    })
}

fn match_envelope<'a, S: AsRef<str>>(
    body: &'a Value,
    collection_keys: &[S],
) -> Result<(&'a Vec<Value>, EnvelopeShape), ShapeError> {
    match body {
        Value::Array(items) => Ok((items, EnvelopeShape::Bare)),
        Value::Object(obj) => {
            if obj.get("success").and_then(Value::as_bool) == Some(false) {
                let message = obj
                    .get("message")
                    .or_else(|| obj.get("error"))
                    .and_then(Value::as_str)
                    .unwrap_or("no message")
                    .to_string();
                return Err(ShapeError::Unsuccessful { message });
            }

            match obj.get("data") {
                Some(Value::Array(items)) => return Ok((items, EnvelopeShape::Flagged)),
                Some(Value::Object(inner)) => {
                    if let Some(found) = named_collection(inner, collection_keys) {
                        return Ok(found);
                    }
                }
                _ => {}
            }

            named_collection(obj, collection_keys).ok_or(ShapeError::UnknownEnvelope {
                found: "an object without data or a known collection key",
            })
        }
        other => Err(ShapeError::UnknownEnvelope {
            found: json_kind(other),
        }),
    }
}

fn named_collection<'a, S: AsRef<str>>(
    obj: &'a Map<String, Value>,
    collection_keys: &[S],
) -> Option<(&'a Vec<Value>, EnvelopeShape)> {
    collection_keys.iter().find_map(|key| {
        let key = key.as_ref();
        obj.get(key)
            .and_then(Value::as_array)
            .map(|items| (items, EnvelopeShape::Named(key.to_string())))
    })
}

/// Keep the last record for each id, at the position of that last record.
fn dedup_last_wins(records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
    let mut seen = HashSet::new();
    let mut kept: Vec<CatalogRecord> = records
        .into_iter()
        .rev()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    kept.reverse();
    kept
}

fn preview(obj: &Map<String, Value>) -> String {
    let text = Value::Object(obj.clone()).to_string();
    match text.char_indices().nth(120) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEYS: &[&str] = &["gemstones", "gems"];

    fn ids(n: &Normalized) -> Vec<&str> {
        n.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn flagged_envelope() {
        let body = json!({"success": true, "data": [{"id": "a"}, {"id": "b"}]});
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(n.shape, EnvelopeShape::Flagged);
        assert_eq!(ids(&n), ["a", "b"]);
    }

    #[test]
    fn data_without_success_flag_is_flagged_shape() {
        let body = json!({"data": [{"id": "a"}]});
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(n.shape, EnvelopeShape::Flagged);
    }

    #[test]
    fn named_collection_inside_data() {
        let body = json!({"success": true, "data": {"gems": [{"id": "a"}], "total": 1}});
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(n.shape, EnvelopeShape::Named("gems".to_string()));
        assert_eq!(ids(&n), ["a"]);
    }

    #[test]
    fn collection_keys_are_tried_in_order() {
        let body = json!({"gems": [{"id": "second"}], "gemstones": [{"id": "first"}]});
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(n.shape, EnvelopeShape::Named("gemstones".to_string()));
        assert_eq!(ids(&n), ["first"]);
    }

    #[test]
    fn data_array_beats_named_key() {
        let body = json!({"data": [{"id": "d"}], "gemstones": [{"id": "g"}]});
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(ids(&n), ["d"]);
    }

    #[test]
    fn unsuccessful_flag_is_rejected() {
        let body = json!({"success": false, "message": "Not authorized", "data": []});
        assert_eq!(
            normalize(&body, KEYS),
            Err(ShapeError::Unsuccessful {
                message: "Not authorized".to_string()
            })
        );
    }

    #[test]
    fn unknown_shapes_are_shape_errors() {
        assert!(matches!(
            normalize(&json!({"items": []}), KEYS),
            Err(ShapeError::UnknownEnvelope { .. })
        ));
        assert!(matches!(
            normalize(&json!("hello"), KEYS),
            Err(ShapeError::UnknownEnvelope { found: "a string" })
        ));
        assert!(matches!(
            normalize(&Value::Null, KEYS),
            Err(ShapeError::UnknownEnvelope { found: "null" })
        ));
    }

    #[test]
    fn non_object_elements_fail_the_batch() {
        let body = json!([{"id": "a"}, null]);
        assert_eq!(
            normalize(&body, KEYS),
            Err(ShapeError::NotRecordLike {
                index: 1,
                found: "null"
            })
        );
    }

    #[test]
    fn records_without_id_are_dropped_not_fatal() {
        let body = json!([{"id": "a"}, {"name": "orphan"}, {"id": "c"}]);
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(ids(&n), ["a", "c"]);
        assert_eq!(n.dropped, 1);
    }

    #[test]
    fn duplicate_ids_keep_last_occurrence() {
        let body = json!([
            {"id": "a", "price": 1},
            {"id": "b"},
            {"id": "a", "price": 2},
        ]);
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(ids(&n), ["b", "a"]);
        assert_eq!(n.records[1].price, 2.0);
        assert_eq!(n.duplicates, 1);
    }

    #[test]
    fn integer_and_integral_float_ids_are_duplicates() {
        let body = json!([{"id": 1, "price": 1}, {"id": 1.0, "price": 2}]);
        let n = normalize(&body, KEYS).unwrap();
        assert_eq!(ids(&n), ["1"]);
        assert_eq!(n.records[0].price, 2.0);
        assert_eq!(n.duplicates, 1);
    }

    #[test]
    fn empty_array_is_an_empty_catalog() {
        let n = normalize(&json!({"success": true, "data": []}), KEYS).unwrap();
        assert!(n.records.is_empty());
    }
}
