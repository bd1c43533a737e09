use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shrine_catalog::categories;
use shrine_core::Family;

use crate::error::CliError;

pub(crate) fn run_categories(family: Family, quiet: bool) -> Result<(), CliError> {
    let controller = super::load_catalog(family, quiet)?;
    let counts = categories(controller.snapshot());

    log::info!(
        "{} {}",
        format!("{} categories", family.display_name()).if_supports_color(Stdout, |t| t.bold()),
        format!("({} products)", controller.snapshot().len())
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if counts.is_empty() {
        log::info!("  No categorized products.");
        return Ok(());
    }

    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, count) in &counts {
        log::info!(
            "  {}  {}",
            format!("{:<width$}", name).if_supports_color(Stdout, |t| t.cyan()),
            count,
        );
    }
    Ok(())
}
