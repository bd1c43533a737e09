use shrine_catalog::ShapeError;

/// Why one candidate endpoint, or a whole fetch, did not produce records.
///
/// Every variant is recoverable: the controller surfaces it as an error
/// status and the caller may retry with a new refresh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection refused, TLS, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The body was not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(String),

    /// Valid JSON, but not a catalog payload.
    #[error("unexpected response shape: {0}")]
    Shape(#[from] ShapeError),

    /// A newer refresh superseded this one.
    #[error("fetch cancelled by a newer request")]
    Cancelled,

    /// The candidate list was empty.
    #[error("no candidate endpoints configured")]
    NoEndpoints,
}

impl FetchError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Short label used in attempt traces.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Http { .. } => "http",
            Self::Parse(_) => "parse",
            Self::Shape(_) => "shape",
            Self::Cancelled => "cancelled",
            Self::NoEndpoints => "config",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network(format!("request timed out: {e}"))
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Errors loading or saving the catalog configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the config directory")]
    NoConfigDir,
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
