pub(crate) mod browse;
pub(crate) mod categories;
pub(crate) mod config;
pub(crate) mod families;

use shrine_core::Family;
use shrine_fetch::{CatalogConfig, CatalogController, HttpTransport, Status};

use crate::error::CliError;
use crate::spinner::spinner;

pub(crate) fn load_config() -> Result<CatalogConfig, CliError> {
    CatalogConfig::load().map_err(|e| CliError::config(e.to_string()))
}

/// Fetch one family's catalog into a ready controller.
///
/// Each candidate endpoint tried is reported at debug level. Fails only
/// when no candidate produced a catalog.
pub(crate) fn load_catalog(
    family: Family,
    quiet: bool,
) -> Result<CatalogController<HttpTransport>, CliError> {
    let config = load_config()?;
    let family_config = config.family(family).clone();
    let transport = HttpTransport::new(family_config.request_timeout)
        .map_err(|e| CliError::fetch(e.to_string()))?;
    let mut controller = CatalogController::new(family_config, transport);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(e.to_string()))?;

    let pb = spinner(quiet, format!("Fetching {}...", family.display_name()));
    let attempts = rt.block_on(controller.refresh());
    pb.finish_and_clear();

    for attempt in &attempts {
        match &attempt.result {
            Ok(n) => log::debug!("  {} -> {} record(s)", attempt.endpoint, n),
            Err(e) => log::debug!("  {} -> {} ({})", attempt.endpoint, e.kind(), e),
        }
    }

    if controller.status() == Status::Error {
        let reason = controller
            .view()
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(CliError::fetch(format!(
            "could not load {}: {}",
            family.display_name(),
            reason
        )));
    }
    Ok(controller)
}
