//! Query state for browsing views: category, price range, search, sort.

use std::fmt;
use std::str::FromStr;

/// Errors from parsing query parameters typed by a user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryParseError {
    #[error("invalid price range '{0}' (expected 'all', 'low-high' or 'low+')")]
    PriceRange(String),

    #[error("price range '{0}' has its low bound above its high bound")]
    InvertedRange(String),

    #[error("unknown sort key '{0}' (expected popular, price-asc, price-desc, rating or newest)")]
    SortKey(String),
}

/// Category selection. Category values are identifiers, compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == "all" {
            Self::All
        } else {
            Self::Exact(s.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Exact(c) => write!(f, "{c}"),
        }
    }
}

/// Inclusive numeric range on the record price.
///
/// An open-ended bucket such as "above 20,000" has `high = f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PriceRange {
    #[default]
    All,
    Between { low: f64, high: f64 },
}

impl PriceRange {
    pub fn between(low: f64, high: f64) -> Self {
        Self::Between { low, high }
    }

    pub fn at_least(low: f64) -> Self {
        Self::Between {
            low,
            high: f64::INFINITY,
        }
    }

    /// Whether `value` falls inside the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::All => true,
            Self::Between { low, high } => value >= low && value <= high,
        }
    }
}

impl FromStr for PriceRange {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let bad = || QueryParseError::PriceRange(s.to_string());
        let bound = |v: &str| -> Result<f64, QueryParseError> {
            let n: f64 = v.trim().replace(',', "").parse().map_err(|_| bad())?;
            if n.is_finite() && n >= 0.0 { Ok(n) } else { Err(bad()) }
        };

        if let Some(low) = t.strip_suffix('+') {
            return Ok(Self::at_least(bound(low)?));
        }
        let (low, high) = t.split_once('-').ok_or_else(bad)?;
        let (low, high) = (bound(low)?, bound(high)?);
        if low > high {
            return Err(QueryParseError::InvertedRange(s.to_string()));
        }
        Ok(Self::between(low, high))
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::All => write!(f, "all"),
            Self::Between { low, high } if high.is_infinite() => write!(f, "{low}+"),
            Self::Between { low, high } => write!(f, "{low}-{high}"),
        }
    }
}

/// Ordering applied as the last pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Review count descending, then rating descending.
    #[default]
    Popularity,
    PriceAsc,
    PriceDesc,
    /// Rating descending, then review count descending.
    Rating,
    /// Creation time descending; records without a timestamp sort last.
    Newest,
}

const ALL_SORT_KEYS: &[SortKey] = &[
    SortKey::Popularity,
    SortKey::PriceAsc,
    SortKey::PriceDesc,
    SortKey::Rating,
    SortKey::Newest,
];

impl SortKey {
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Popularity => "popular",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Popularity => &["popular", "popularity", "featured"],
            Self::PriceAsc => &["price-asc", "price-low", "price_low"],
            Self::PriceDesc => &["price-desc", "price-high", "price_high"],
            Self::Rating => &["rating", "top-rated"],
            Self::Newest => &["newest", "recent", "latest"],
        }
    }

    pub fn all() -> &'static [SortKey] {
        ALL_SORT_KEYS
    }
}

impl FromStr for SortKey {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_SORT_KEYS
            .iter()
            .copied()
            .find(|k| k.aliases().contains(&lower.as_str()))
            .ok_or_else(|| QueryParseError::SortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// The user's current browsing intent.
///
/// Created with defaults when a catalog is opened and changed only by
/// explicit user action; fetching never touches it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub category: CategoryFilter,
    pub price_range: PriceRange,
    pub search_term: String,
    pub sort_key: SortKey,
}

/// A partial update to a [`QueryState`]. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPatch {
    pub category: Option<CategoryFilter>,
    pub price_range: Option<PriceRange>,
    pub search_term: Option<String>,
    pub sort_key: Option<SortKey>,
}

impl QueryPatch {
    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort_key = Some(key);
        self
    }
}

impl QueryState {
    /// Merge a partial update into this state.
    pub fn apply(&mut self, patch: QueryPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(range) = patch.price_range {
            self.price_range = range;
        }
        if let Some(term) = patch.search_term {
            self.search_term = term;
        }
        if let Some(key) = patch.sort_key {
            self.sort_key = key;
        }
    }
}
