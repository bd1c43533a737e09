//! Fetching and state for the shrine catalog engine.
//!
//! [`EndpointFetcher`] walks a family's candidate endpoints through a
//! [`Transport`] until one yields a catalog. [`CatalogController`] owns the
//! resulting snapshot and query, and applies only the latest refresh.
//! [`CatalogConfig`] resolves base URL, timeouts and per-family overrides
//! from the environment, the config file and built-in defaults.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod transport;

pub use config::{CatalogConfig, ConfigSource, ConfigSources, FamilyConfig, config_path};
pub use controller::{CatalogController, CatalogView, RefreshTicket, Status};
pub use error::{ConfigError, FetchError};
pub use fetcher::{EndpointFetcher, FetchAttempt, FetchOutcome, FetchReport};
pub use transport::{HttpTransport, RawResponse, Transport};
