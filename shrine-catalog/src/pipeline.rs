//! Filter/sort/search pipeline over a normalized snapshot.
//!
//! Stages run in a fixed order and each one either narrows or reorders:
//!
//! 1. visibility (`is_active`), unconditional
//! 2. category, exact match
//! 3. price range, inclusive
//! 4. free-text search over the family's searchable fields
//! 5. stable sort by the selected key
//!
//! The pipeline is a pure function of its inputs. It keeps no state and
//! returns positions into (or references to) the caller's collection.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;
use shrine_core::{CatalogRecord, CategoryFilter, QueryState, SortKey};

/// Indices into `records` of the derived view, in display order.
pub fn select<S: AsRef<str>>(
    records: &[CatalogRecord],
    query: &QueryState,
    searchable_fields: &[S],
) -> Vec<usize> {
    let needle = query.search_term.trim().to_lowercase();

    let mut view: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_active)
        .filter(|(_, r)| matches_category(r, &query.category))
        .filter(|(_, r)| query.price_range.contains(r.price))
        .filter(|(_, r)| needle.is_empty() || matches_search(r, &needle, searchable_fields))
        .map(|(i, _)| i)
        .collect();

    // sort_by is stable, so equal keys keep snapshot order.
    view.sort_by(|&a, &b| compare(&records[a], &records[b], query.sort_key));
    view
}

/// The derived view as references into `records`.
pub fn apply<'a, S: AsRef<str>>(
    records: &'a [CatalogRecord],
    query: &QueryState,
    searchable_fields: &[S],
) -> Vec<&'a CatalogRecord> {
    select(records, query, searchable_fields)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Distinct categories among visible records, with counts, sorted by name.
pub fn categories(records: &[CatalogRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in records.iter().filter(|r| r.is_active) {
        if let Some(cat) = rec.category.as_deref() {
            *counts.entry(cat).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(cat, n)| (cat.to_string(), n))
        .collect()
}

/// Discount percentage shown on a product card.
///
/// An explicit discount field on the record wins; otherwise it is derived
/// from `original_price` when that is above `price`.
pub fn discount_percent(record: &CatalogRecord) -> Option<u32> {
    let explicit = ["discount", "discountPercent", "discountPercentage"]
        .iter()
        .find_map(|f| record.number(f))
        .filter(|d| d.is_finite() && *d > 0.0);
    if let Some(d) = explicit {
        return Some(d.round().min(100.0) as u32);
    }

    let original = record.original_price?;
    if original > record.price && original > 0.0 {
        Some(((original - record.price) / original * 100.0).round() as u32)
    } else {
        None
    }
}

fn matches_category(record: &CatalogRecord, filter: &CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Exact(want) => record.category.as_deref() == Some(want.as_str()),
    }
}

fn matches_search<S: AsRef<str>>(record: &CatalogRecord, needle: &str, fields: &[S]) -> bool {
    fields
        .iter()
        .filter_map(|f| record.field(f.as_ref()))
        .any(|v| value_contains(v, needle))
}

/// Case-insensitive substring match; a list matches if any element does.
fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        _ => false,
    }
}

fn compare(a: &CatalogRecord, b: &CatalogRecord, key: SortKey) -> Ordering {
    let rating = |r: &CatalogRecord| r.rating.unwrap_or(0.0);
    let reviews = |r: &CatalogRecord| r.review_count.unwrap_or(0);

    match key {
        SortKey::PriceAsc => a.price.total_cmp(&b.price),
        SortKey::PriceDesc => b.price.total_cmp(&a.price),
        SortKey::Rating => rating(b)
            .total_cmp(&rating(a))
            .then_with(|| reviews(b).cmp(&reviews(a))),
        SortKey::Popularity => reviews(b)
            .cmp(&reviews(a))
            .then_with(|| rating(b).total_cmp(&rating(a))),
        // None < Some, so reversing puts undated records last.
        SortKey::Newest => b.created_at.cmp(&a.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shrine_core::{PriceRange, QueryPatch};

    const FIELDS: &[&str] = &["name", "description", "category", "planet", "benefits"];

    fn rec(v: Value) -> CatalogRecord {
        let Value::Object(obj) = v else {
            panic!("fixture must be an object")
        };
        CatalogRecord::from_raw(obj).unwrap()
    }

    fn ids(view: &[&CatalogRecord]) -> Vec<String> {
        view.iter().map(|r| r.id.clone()).collect()
    }

    fn query(patch: QueryPatch) -> QueryState {
        let mut q = QueryState::default();
        q.apply(patch);
        q
    }

    #[test]
    fn inactive_records_never_show() {
        let records = vec![
            rec(json!({"id": "a", "isActive": false, "name": "Ruby"})),
            rec(json!({"id": "b", "name": "Ruby"})),
        ];
        let view = apply(&records, &query(QueryPatch::default().search("ruby")), FIELDS);
        assert_eq!(ids(&view), ["b"]);
    }

    #[test]
    fn search_matches_any_list_element_case_insensitively() {
        let records = vec![
            rec(json!({"id": "a", "benefits": ["Wealth", "Courage"]})),
            rec(json!({"id": "b", "benefits": ["Peace"]})),
            rec(json!({"id": "c", "planet": "Mars"})),
        ];
        let view = apply(&records, &query(QueryPatch::default().search("COUR")), FIELDS);
        assert_eq!(ids(&view), ["a"]);
        let view = apply(&records, &query(QueryPatch::default().search("  mars ")), FIELDS);
        assert_eq!(ids(&view), ["c"]);
    }

    #[test]
    fn search_ignores_fields_outside_the_searchable_set() {
        let records = vec![rec(json!({"id": "a", "sku": "RUBY-01"}))];
        let view = apply(&records, &query(QueryPatch::default().search("ruby")), FIELDS);
        assert!(view.is_empty());
    }

    #[test]
    fn category_match_is_exact_and_case_sensitive() {
        let records = vec![
            rec(json!({"id": "a", "category": "gem"})),
            rec(json!({"id": "b", "category": "Gem"})),
            rec(json!({"id": "c"})),
        ];
        let view = apply(&records, &query(QueryPatch::default().category("gem")), FIELDS);
        assert_eq!(ids(&view), ["a"]);
    }

    #[test]
    fn open_ended_price_range() {
        let records = vec![
            rec(json!({"id": "a", "price": 19999})),
            rec(json!({"id": "b", "price": 20000})),
            rec(json!({"id": "c", "price": 150000})),
        ];
        let q = query(
            QueryPatch::default()
                .price_range(PriceRange::at_least(20000.0))
                .sort(SortKey::PriceAsc),
        );
        assert_eq!(ids(&apply(&records, &q, FIELDS)), ["b", "c"]);
    }

    #[test]
    fn rating_sort_breaks_ties_by_review_count() {
        let records = vec![
            rec(json!({"id": "a", "rating": 4.5, "reviewCount": 3})),
            rec(json!({"id": "b", "rating": 4.8, "reviewCount": 1})),
            rec(json!({"id": "c", "rating": 4.5, "reviewCount": 30})),
        ];
        let q = query(QueryPatch::default().sort(SortKey::Rating));
        assert_eq!(ids(&apply(&records, &q, FIELDS)), ["b", "c", "a"]);
    }

    #[test]
    fn popularity_is_default_and_breaks_ties_by_rating() {
        let records = vec![
            rec(json!({"id": "a", "rating": 3.0, "reviewCount": 10})),
            rec(json!({"id": "b", "rating": 4.0, "reviewCount": 10})),
            rec(json!({"id": "c", "reviewCount": 50})),
        ];
        let view = apply(&records, &QueryState::default(), FIELDS);
        assert_eq!(ids(&view), ["c", "b", "a"]);
    }

    #[test]
    fn newest_puts_undated_last() {
        let records = vec![
            rec(json!({"id": "old", "createdAt": "2023-01-01T00:00:00Z"})),
            rec(json!({"id": "none"})),
            rec(json!({"id": "new", "createdAt": "2024-06-01T00:00:00Z"})),
        ];
        let q = query(QueryPatch::default().sort(SortKey::Newest));
        assert_eq!(ids(&apply(&records, &q, FIELDS)), ["new", "old", "none"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let records = vec![
            rec(json!({"id": "x", "price": 100})),
            rec(json!({"id": "y", "price": 50})),
            rec(json!({"id": "z", "price": 100})),
            rec(json!({"id": "w", "price": 100})),
        ];
        let q = query(QueryPatch::default().sort(SortKey::PriceDesc));
        assert_eq!(ids(&apply(&records, &q, FIELDS)), ["x", "z", "w", "y"]);
    }

    #[test]
    fn derived_discount() {
        let r = rec(json!({"id": "a", "price": 750, "originalPrice": 1000}));
        assert_eq!(discount_percent(&r), Some(25));
        let r = rec(json!({"id": "a", "price": 1000, "originalPrice": 1000}));
        assert_eq!(discount_percent(&r), None);
        let r = rec(json!({"id": "a", "price": 2000, "originalPrice": 3000}));
        assert_eq!(discount_percent(&r), Some(33));
    }

    #[test]
    fn explicit_discount_wins() {
        let r = rec(json!({"id": "a", "price": 750, "originalPrice": 1000, "discount": 10}));
        assert_eq!(discount_percent(&r), Some(10));
    }

    #[test]
    fn explicit_discount_as_string_wins() {
        let r = rec(json!({"id": "a", "price": 750, "originalPrice": 1000, "discount": "10"}));
        assert_eq!(discount_percent(&r), Some(10));
    }

    #[test]
    fn string_and_numeric_inactive_flags_hide_records() {
        let records = vec![
            rec(json!({"id": "a", "isActive": "false"})),
            rec(json!({"id": "b", "isActive": 0})),
            rec(json!({"id": "c", "isActive": "true"})),
        ];
        assert_eq!(ids(&apply(&records, &QueryState::default(), FIELDS)), ["c"]);
    }

    #[test]
    fn categories_counts_visible_records_only() {
        let records = vec![
            rec(json!({"id": "a", "category": "rudraksha"})),
            rec(json!({"id": "b", "category": "gem"})),
            rec(json!({"id": "c", "category": "gem"})),
            rec(json!({"id": "d", "category": "hidden", "isActive": false})),
        ];
        assert_eq!(
            categories(&records),
            vec![("gem".to_string(), 2), ("rudraksha".to_string(), 1)]
        );
    }
}
