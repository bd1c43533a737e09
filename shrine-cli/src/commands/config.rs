use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shrine_fetch::{ConfigError, config_path};

use crate::error::CliError;

/// Show the effective configuration and the source of each value.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    log::info!(
        "{}",
        "Catalog Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match config_path() {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let config = super::load_config()?;
    let fields = [
        ("base_url", config.base_url.clone(), &config.sources.base_url),
        (
            "request_timeout",
            format!("{}s", config.request_timeout.as_secs()),
            &config.sources.request_timeout,
        ),
    ];
    for (name, value, source) in fields {
        log::info!(
            "  {} {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    for fc in config.families() {
        let origin = if config.sources.overridden_families.contains(&fc.family) {
            "(config file)"
        } else {
            "(default)"
        };
        log::info!("");
        log::info!(
            "  {} {}",
            format!("[{}]", fc.family.short_name()).if_supports_color(Stdout, |t| t.bold()),
            origin.if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("    endpoints:       {}", fc.endpoints.join(", "));
        log::info!("    collection keys: {}", fc.collection_keys.join(", "));
        log::info!("    search fields:   {}", fc.searchable_fields.join(", "));
        log::info!(
            "    images:          {} ({})",
            if fc.uploads_namespace { "/uploads/<file>" } else { "/<file>" },
            fc.placeholder,
        );
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = config_path().ok_or_else(|| CliError::config(ConfigError::NoConfigDir.to_string()))?;
    log::info!("{}", path.display());
    Ok(())
}

/// Write the effective configuration to the config file.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = config_path().ok_or_else(|| CliError::config(ConfigError::NoConfigDir.to_string()))?;
    let config = super::load_config()?;
    config
        .save_to(&path, force)
        .map_err(|e| CliError::config(e.to_string()))?;

    log::info!(
        "{} Config written to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
