//! Catalog engine: envelope normalization, asset resolution, and the
//! filter/sort/search pipeline.
//!
//! Everything in this crate is synchronous and total. Fetching and the
//! controller that owns a snapshot live in `shrine-fetch`; this crate only
//! turns JSON into records and records into views.

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod resolve;

pub use error::ShapeError;
pub use normalize::{EnvelopeShape, Normalized, normalize};
pub use pipeline::{apply, categories, discount_percent, select};
pub use resolve::{AssetRef, AssetResolver, UploadLayout, classify};
