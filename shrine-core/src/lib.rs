//! Core data model for the shrine catalog engine.
//!
//! This crate defines the product families, the normalized record type,
//! and the query state that drives browsing views. It has no I/O and no
//! async dependencies; the normalizer, resolver, and pipeline live in
//! `shrine-catalog`, and fetching lives in `shrine-fetch`.

pub mod family;
pub mod query;
pub mod record;

pub use family::{Family, FamilyParseError, IMAGE_FIELDS};
pub use query::{CategoryFilter, PriceRange, QueryParseError, QueryPatch, QueryState, SortKey};
pub use record::CatalogRecord;
