//! The normalized catalog record.
//!
//! The content service has changed field names several times over its
//! life, so extraction accepts a handful of aliases per field. The raw
//! object is kept alongside the typed core so family-specific fields
//! (author, deity, planet, image candidates) stay reachable.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// One catalog item: a book, gemstone, yantra, or sadhana program.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub id: String,
    pub is_active: bool,
    pub in_stock: bool,
    pub price: f64,
    pub original_price: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    /// The record exactly as the content service sent it.
    pub raw: Map<String, Value>,
}

impl CatalogRecord {
    /// Build a record from a raw JSON object.
    ///
    /// Returns `None` when the object cannot be a valid record: no usable
    /// `id`, or a negative/non-finite price. Every other field degrades to
    /// its default instead of rejecting the record.
    pub fn from_raw(raw: Map<String, Value>) -> Option<Self> {
        let id = first_present(&raw, &["id", "_id"]).and_then(id_text)?;

        let price = match first_present(&raw, &["price"]) {
            Some(v) => number(v)?,
            None => 0.0,
        };
        if !price.is_finite() || price < 0.0 {
            return None;
        }

        let original_price = first_present(&raw, &["originalPrice", "original_price", "mrp"])
            .and_then(number)
            .filter(|op| op.is_finite() && *op >= price);

        let is_active = first_flag(&raw, &["isActive", "is_active", "active"]).unwrap_or(true);

        let in_stock = first_flag(&raw, &["inStock", "in_stock"])
            .or_else(|| {
                first_present(&raw, &["stock", "quantity"])
                    .and_then(number)
                    .map(|n| n > 0.0)
            })
            .unwrap_or(true);

        let rating = raw
            .get("rating")
            .and_then(number)
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0));

        let review_count = first_present(&raw, &["reviewCount", "reviews", "numReviews"])
            .and_then(number)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64);

        let created_at = first_present(&raw, &["createdAt", "created_at"]).and_then(timestamp);

        let category = raw
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            id,
            is_active,
            in_stock,
            price,
            original_price,
            rating,
            review_count,
            created_at,
            category,
            raw,
        })
    }

    /// Display name, falling back to `title` and then the id.
    pub fn name(&self) -> &str {
        self.text("name")
            .or_else(|| self.text("title"))
            .unwrap_or(self.id.as_str())
    }

    /// A string-valued raw field, if present and non-empty.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.raw
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Any raw field by name.
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.raw.get(field)
    }

    /// A numeric raw field; numeric strings count.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.raw.get(field).and_then(number)
    }
}

fn first_present<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .find(|v| !v.is_null())
}

fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => match n.as_f64() {
            // 1 and 1.0 are the same id.
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

/// Boolean flags as `true`/`false`, `"true"`/`"false"` in any case, or `0`/`1`.
fn flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// First alias holding a readable flag.
fn first_flag(raw: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().filter_map(|k| raw.get(*k)).find_map(flag)
}

/// Numbers arrive either as JSON numbers or numeric strings ("1499.00").
fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// RFC 3339 strings or epoch milliseconds.
fn timestamp(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
