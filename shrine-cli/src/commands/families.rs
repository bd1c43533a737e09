use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shrine_core::Family;

use crate::error::CliError;

pub(crate) fn run_families() -> Result<(), CliError> {
    let config = super::load_config()?;

    log::info!("Product families:");
    for family in Family::all() {
        let fc = config.family(*family);
        log::info!("");
        log::info!(
            "  {} [{}]",
            family.short_name().if_supports_color(Stdout, |t| t.bold()),
            family.display_name().if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Aliases: {}", family.aliases().join(", "));
        log::info!("    Collection keys: {}", fc.collection_keys.join(", "));
        log::info!("    Price ranges: {}", family.price_buckets().join(", "));
        for (i, endpoint) in fc.endpoints.iter().enumerate() {
            log::info!(
                "    {} {}",
                format!("{}.", i + 1).if_supports_color(Stdout, |t| t.dimmed()),
                endpoint,
            );
        }
    }
    Ok(())
}
