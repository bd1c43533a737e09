//! Catalog configuration: base URL, timeouts, and per-family overrides.
//!
//! Values resolve with the priority env var > config file > built-in
//! default, and each resolved value remembers where it came from so the
//! CLI can explain the effective configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shrine_catalog::{AssetResolver, UploadLayout};
use shrine_core::{Family, IMAGE_FIELDS};
use tokio::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const ENV_BASE_URL: &str = "SHRINE_BASE_URL";
const ENV_CONFIG: &str = "SHRINE_CONFIG";

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default value.
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of the top-level settings.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub base_url: ConfigSource,
    pub request_timeout: ConfigSource,
    /// Families with at least one override in the config file.
    pub overridden_families: Vec<Family>,
}

/// Everything the engine needs to run one product family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyConfig {
    pub family: Family,
    pub base_url: String,
    /// Candidate endpoints, absolute, in the order they are tried.
    pub endpoints: Vec<String>,
    pub collection_keys: Vec<String>,
    pub searchable_fields: Vec<String>,
    pub image_fields: Vec<String>,
    pub uploads_namespace: bool,
    pub placeholder: String,
    pub request_timeout: Duration,
}

impl FamilyConfig {
    /// The family's built-in settings against `base_url`.
    pub fn defaults(family: Family, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            family,
            base_url: base.to_string(),
            endpoints: family
                .default_routes()
                .iter()
                .map(|route| format!("{base}{route}"))
                .collect(),
            collection_keys: owned(family.collection_keys()),
            searchable_fields: owned(family.searchable_fields().as_slice()),
            image_fields: owned(IMAGE_FIELDS),
            uploads_namespace: family.uploads_namespace(),
            placeholder: family.placeholder().to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Asset resolver configured for this family.
    pub fn resolver(&self) -> AssetResolver {
        let layout = if self.uploads_namespace {
            UploadLayout::Uploads
        } else {
            UploadLayout::Root
        };
        AssetResolver::new(
            &self.base_url,
            self.image_fields.clone(),
            layout,
            self.placeholder.clone(),
        )
    }

    /// Check the invariants the fetcher relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let family = self.family.short_name();
        if self.endpoints.is_empty() {
            return Err(ConfigError::invalid(format!(
                "{family}: at least one endpoint is required"
            )));
        }
        for endpoint in &self.endpoints {
            check_absolute(endpoint)
                .map_err(|e| ConfigError::invalid(format!("{family}: endpoint {e}")))?;
        }
        if self.collection_keys.is_empty() {
            log::debug!("{}: no collection keys, only data/bare envelopes will match", family);
        }
        Ok(())
    }
}

/// Resolved configuration for all families.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub sources: ConfigSources,
    families: BTreeMap<Family, FamilyConfig>,
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    families: BTreeMap<String, FamilyFile>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FamilyFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    searchable_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uploads_namespace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
}

/// Path to the config file: `$SHRINE_CONFIG`, else
/// `<config_dir>/shrine/catalog.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(ENV_CONFIG) {
        if !p.is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    dirs::config_dir().map(|d| d.join("shrine").join("catalog.toml"))
}

impl CatalogConfig {
    /// Load from the environment and the default config file location.
    pub fn load() -> Result<Self, ConfigError> {
        let env_base = std::env::var(ENV_BASE_URL).ok().filter(|s| !s.is_empty());
        Self::load_from(config_path().as_deref(), env_base)
    }

    /// Load from an explicit file (missing file is fine) and an optional
    /// base URL override.
    pub fn load_from(path: Option<&Path>, env_base_url: Option<String>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if p.exists() => {
                let contents = std::fs::read_to_string(p)?;
                let parsed: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                    path: p.display().to_string(),
                    message: e.to_string(),
                })?;
                log::debug!("Loaded catalog config from {}", p.display());
                parsed
            }
            _ => ConfigFile::default(),
        };
        Self::resolve(file, env_base_url)
    }

    /// Parse config text directly, without touching the filesystem.
    pub fn from_toml(contents: &str, env_base_url: Option<String>) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        Self::resolve(file, env_base_url)
    }

    fn resolve(file: ConfigFile, env_base_url: Option<String>) -> Result<Self, ConfigError> {
        let (base_url, base_source) = match (env_base_url, file.base_url) {
            (Some(v), _) => (v, ConfigSource::EnvVar(ENV_BASE_URL)),
            (None, Some(v)) => (v, ConfigSource::ConfigFile),
            (None, None) => (DEFAULT_BASE_URL.to_string(), ConfigSource::Default),
        };
        check_absolute(&base_url).map_err(|e| ConfigError::invalid(format!("base_url {e}")))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let (request_timeout, timeout_source) = match file.request_timeout_secs {
            Some(0) => return Err(ConfigError::invalid("request_timeout_secs must be positive")),
            Some(secs) => (Duration::from_secs(secs), ConfigSource::ConfigFile),
            None => (
                Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                ConfigSource::Default,
            ),
        };

        let mut overrides: BTreeMap<Family, FamilyFile> = BTreeMap::new();
        for (name, table) in file.families {
            let family: Family = name
                .parse()
                .map_err(|e| ConfigError::invalid(format!("[families.{name}]: {e}")))?;
            overrides.insert(family, table);
        }
        let overridden_families = overrides.keys().copied().collect();

        let mut families = BTreeMap::new();
        for &family in Family::all() {
            let mut fc = FamilyConfig::defaults(family, &base_url);
            fc.request_timeout = request_timeout;
            if let Some(o) = overrides.remove(&family) {
                if let Some(endpoints) = o.endpoints {
                    fc.endpoints = endpoints
                        .iter()
                        .map(|e| absolutize(&base_url, e))
                        .collect();
                }
                if let Some(keys) = o.collection_keys {
                    fc.collection_keys = keys;
                }
                if let Some(fields) = o.searchable_fields {
                    fc.searchable_fields = fields;
                }
                if let Some(fields) = o.image_fields {
                    fc.image_fields = fields;
                }
                if let Some(uploads) = o.uploads_namespace {
                    fc.uploads_namespace = uploads;
                }
                if let Some(placeholder) = o.placeholder {
                    fc.placeholder = placeholder;
                }
            }
            fc.validate()?;
            families.insert(family, fc);
        }

        Ok(Self {
            base_url,
            request_timeout,
            sources: ConfigSources {
                base_url: base_source,
                request_timeout: timeout_source,
                overridden_families,
            },
            families,
        })
    }

    /// Settings for one family. Every family always has an entry.
    pub fn family(&self, family: Family) -> &FamilyConfig {
        &self.families[&family]
    }

    pub fn families(&self) -> impl Iterator<Item = &FamilyConfig> {
        self.families.values()
    }

    /// Render the fully-resolved configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            base_url: Some(self.base_url.clone()),
            request_timeout_secs: Some(self.request_timeout.as_secs()),
            families: self
                .families
                .values()
                .map(|fc| {
                    (
                        fc.family.short_name().to_string(),
                        FamilyFile {
                            endpoints: Some(fc.endpoints.clone()),
                            collection_keys: Some(fc.collection_keys.clone()),
                            searchable_fields: Some(fc.searchable_fields.clone()),
                            image_fields: Some(fc.image_fields.clone()),
                            uploads_namespace: Some(fc.uploads_namespace),
                            placeholder: Some(fc.placeholder.clone()),
                        },
                    )
                })
                .collect(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Write the resolved configuration to `path`.
    ///
    /// Refuses to replace an existing file unless `force` is set. The write
    /// goes through a temp file and a rename so a crash never leaves a
    /// half-written config behind.
    pub fn save_to(&self, path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::invalid(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Endpoints in the file may be root-relative to the base URL.
fn absolutize(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{base_url}{endpoint}")
    } else {
        endpoint.to_string()
    }
}

fn check_absolute(url: &str) -> Result<(), String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| format!("'{url}' is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("'{url}' has unsupported scheme '{other}'")),
    }
}
