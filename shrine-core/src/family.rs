/// Product family identifiers for every catalog the storefront serves.
///
/// Each family is backed by its own set of content-service routes and its
/// own envelope key, but all of them share one engine. This enum centralizes
/// the per-family defaults (routes, collection keys, searchable fields) that
/// used to be scattered across each family's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Books,
    Gemstones,
    Yantras,
    Sadhanas,
}

/// All family variants in registration order.
const ALL_FAMILIES: &[Family] = &[
    Family::Books,
    Family::Gemstones,
    Family::Yantras,
    Family::Sadhanas,
];

/// Candidate image fields, highest precedence first.
///
/// Shared by every family so a record carrying both `image` and `imageUrl`
/// renders the same picture wherever it appears.
pub const IMAGE_FIELDS: &[&str] = &[
    "image",
    "imageUrl",
    "imagePath",
    "mediaUrl",
    "thumbnail",
    "coverImage",
    "images",
];

/// Search fields every family matches against.
const BASE_SEARCH_FIELDS: &[&str] = &["name", "description", "category"];

impl Family {
    /// Canonical short name used for CLI arguments and config tables.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Gemstones => "gemstones",
            Self::Yantras => "yantras",
            Self::Sadhanas => "sadhanas",
        }
    }

    /// Human-facing name for headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Books => "Books",
            Self::Gemstones => "Gemstones",
            Self::Yantras => "Yantras",
            Self::Sadhanas => "Sadhana Programs",
        }
    }

    /// All accepted names for this family (case-insensitive matching).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Books => &["books", "book"],
            Self::Gemstones => &["gemstones", "gemstone", "gems", "gem"],
            Self::Yantras => &["yantras", "yantra"],
            Self::Sadhanas => &["sadhanas", "sadhana", "programs", "program"],
        }
    }

    /// Routes tried in order, relative to the content service base URL.
    ///
    /// Families that historically exposed an admin listing try it first and
    /// fall back to the public route.
    pub fn default_routes(&self) -> &'static [&'static str] {
        match self {
            Self::Books => &["/api/books/admin/all", "/api/books"],
            Self::Gemstones => &["/api/gemstones"],
            Self::Yantras => &["/api/yantras/admin/all", "/api/yantras"],
            Self::Sadhanas => &["/api/sadhanas"],
        }
    }

    /// Envelope keys that may hold this family's record array.
    pub fn collection_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Books => &["books", "book"],
            Self::Gemstones => &["gemstones", "gemstone", "gems"],
            Self::Yantras => &["yantras", "yantra"],
            Self::Sadhanas => &["sadhanas", "sadhana", "programs"],
        }
    }

    /// Fields specific to this family that free-text search looks at.
    fn extra_search_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Books => &["title", "author", "publisher", "language"],
            Self::Gemstones => &["planet", "benefits", "origin", "hindiName"],
            Self::Yantras => &["deity", "benefits", "material"],
            Self::Sadhanas => &["title", "deity", "benefits", "duration"],
        }
    }

    /// Full ordered list of searchable fields: the shared base fields
    /// followed by the family-specific ones.
    pub fn searchable_fields(&self) -> Vec<&'static str> {
        BASE_SEARCH_FIELDS
            .iter()
            .chain(self.extra_search_fields())
            .copied()
            .collect()
    }

    /// Whether the backend stores bare filenames under `/uploads/`.
    pub fn uploads_namespace(&self) -> bool {
        !matches!(self, Self::Sadhanas)
    }

    /// Fallback image shown when a record has no usable image reference.
    pub fn placeholder(&self) -> &'static str {
        "/placeholder.jpg"
    }

    /// Price buckets offered by the storefront filter for this family.
    pub fn price_buckets(&self) -> &'static [&'static str] {
        match self {
            Self::Books => &["0-500", "500-1000", "1000+"],
            Self::Gemstones => &["0-5000", "5000-20000", "20000+"],
            Self::Yantras => &["0-2000", "2000-10000", "10000+"],
            Self::Sadhanas => &["0-1000", "1000-5000", "5000+"],
        }
    }

    /// All four family variants.
    pub fn all() -> &'static [Family] {
        ALL_FAMILIES
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Family`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown catalog family: '{0}'")]
pub struct FamilyParseError(pub String);

impl std::str::FromStr for Family {
    type Err = FamilyParseError;

    /// Parse a family from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_FAMILIES
            .iter()
            .copied()
            .find(|family| family.aliases().contains(&lower.as_str()))
            .ok_or_else(|| FamilyParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for &family in Family::all() {
            let parsed: Family = family.short_name().parse().unwrap();
            assert_eq!(parsed, family, "round-trip failed for {:?}", family);
        }
    }

    #[test]
    fn aliases_resolve_correctly() {
        let cases = [
            ("gems", Family::Gemstones),
            ("Book", Family::Books),
            ("YANTRA", Family::Yantras),
            ("programs", Family::Sadhanas),
        ];
        for (input, expected) in cases {
            let parsed: Family = input.parse().unwrap();
            assert_eq!(parsed, expected, "alias '{}' should parse to {:?}", input, expected);
        }
    }

    #[test]
    fn unknown_string_returns_err() {
        let result: Result<Family, _> = "incense".parse();
        assert!(result.is_err());
    }

    #[test]
    fn short_name_is_first_alias() {
        for &family in Family::all() {
            assert_eq!(family.short_name(), family.aliases()[0]);
        }
    }

    #[test]
    fn searchable_fields_start_with_base_fields() {
        for &family in Family::all() {
            let fields = family.searchable_fields();
            assert_eq!(&fields[..3], BASE_SEARCH_FIELDS);
        }
        assert!(Family::Gemstones.searchable_fields().contains(&"planet"));
        assert!(Family::Books.searchable_fields().contains(&"author"));
    }

    #[test]
    fn every_family_has_at_least_one_route() {
        for &family in Family::all() {
            assert!(!family.default_routes().is_empty());
            assert!(family.default_routes().iter().all(|r| r.starts_with('/')));
        }
    }

    #[test]
    fn image_precedence_starts_with_image() {
        assert_eq!(IMAGE_FIELDS[0], "image");
        assert_eq!(IMAGE_FIELDS[1], "imageUrl");
    }
}
