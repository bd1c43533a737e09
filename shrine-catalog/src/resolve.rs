//! Asset reference resolution.
//!
//! Records carry their image under one of several field names, as an
//! absolute URL, a root-relative path, or a bare upload filename. The
//! resolver turns whichever is present into one fully-qualified URL.

use serde_json::Value;
use shrine_core::{CatalogRecord, Family, IMAGE_FIELDS};

/// How a raw image reference is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRef {
    /// Already has an `http://`/`https://` scheme (or is protocol-relative).
    Absolute,
    /// Starts with `/`; joined directly onto the base URL.
    RootRelative,
    /// Anything else; joined under the upload directory.
    BareFilename,
}

/// Classify a non-empty image reference.
pub fn classify(value: &str) -> AssetRef {
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || value.starts_with("//") {
        AssetRef::Absolute
    } else if value.starts_with('/') {
        AssetRef::RootRelative
    } else {
        AssetRef::BareFilename
    }
}

/// Where bare filenames live on the content service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadLayout {
    /// `base + "/uploads/" + name`
    Uploads,
    /// `base + "/" + name`
    Root,
}

/// Resolves record image references against a base URL.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    base_url: String,
    fields: Vec<String>,
    layout: UploadLayout,
    placeholder: String,
}

impl AssetResolver {
    pub fn new(
        base_url: &str,
        fields: Vec<String>,
        layout: UploadLayout,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fields,
            layout,
            placeholder: placeholder.into(),
        }
    }

    /// Resolver with a family's default fields, layout, and placeholder.
    pub fn for_family(family: Family, base_url: &str) -> Self {
        let layout = if family.uploads_namespace() {
            UploadLayout::Uploads
        } else {
            UploadLayout::Root
        };
        Self::new(
            base_url,
            IMAGE_FIELDS.iter().map(|f| f.to_string()).collect(),
            layout,
            family.placeholder(),
        )
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The first non-empty candidate reference, in precedence order.
    pub fn raw_reference<'a>(&self, record: &'a CatalogRecord) -> Option<&'a str> {
        self.fields
            .iter()
            .find_map(|field| record.field(field).and_then(candidate_text))
    }

    /// Produce exactly one URL for the record's image.
    ///
    /// Falls back to the placeholder when no candidate field holds a value.
    pub fn resolve(&self, record: &CatalogRecord) -> String {
        match self.raw_reference(record) {
            Some(value) => self.resolve_value(value),
            None => self.placeholder.clone(),
        }
    }

    /// Resolve a single raw reference string.
    pub fn resolve_value(&self, value: &str) -> String {
        let value = value.trim();
        match classify(value) {
            AssetRef::Absolute if value.starts_with("//") => format!("https:{value}"),
            AssetRef::Absolute => value.to_string(),
            AssetRef::RootRelative => format!("{}{}", self.base_url, value),
            AssetRef::BareFilename => match self.layout {
                UploadLayout::Uploads => format!("{}/uploads/{}", self.base_url, value),
                UploadLayout::Root => format!("{}/{}", self.base_url, value),
            },
        }
    }
}

/// A string, or the first non-empty string of an array.
fn candidate_text(v: &Value) -> Option<&str> {
    match v {
        Value::String(s) => Some(s.as_str()).filter(|s| !s.trim().is_empty()),
        Value::Array(items) => items.iter().find_map(candidate_text),
        _ => None,
    }
}
