use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shrine_catalog::discount_percent;
use shrine_core::{CatalogRecord, QueryPatch};
use shrine_fetch::{CatalogController, HttpTransport};

use crate::cli_types::BrowseArgs;
use crate::error::CliError;

/// Fetch a family, apply the query, and print the resulting view.
pub(crate) fn run_browse(args: BrowseArgs, quiet: bool) -> Result<(), CliError> {
    let mut controller = super::load_catalog(args.family, quiet)?;

    let mut patch = QueryPatch::default()
        .category(args.category.as_str())
        .price_range(args.price)
        .sort(args.sort);
    if let Some(term) = &args.search {
        patch = patch.search(term.as_str());
    }
    controller.set_query(patch);

    let view = controller.view();
    let matched = view.records.len();
    let shown = args.limit.map_or(matched, |n| n.min(matched));

    log::info!(
        "{} {}",
        args.family
            .display_name()
            .if_supports_color(Stdout, |t| t.bold()),
        format!(
            "({} of {} products, sorted by {})",
            matched,
            controller.snapshot().len(),
            controller.query().sort_key
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if let Some(source) = controller.source() {
        log::debug!("Catalog served by {}", source);
    }
    log::info!("");

    if matched == 0 {
        log::info!("  No products match the current filters.");
        return Ok(());
    }

    for record in view.records.iter().take(shown) {
        print_record(&controller, record, args.show_images);
    }
    if shown < matched {
        log::info!("");
        log::info!(
            "  {}",
            format!("... and {} more (raise --limit to see them)", matched - shown)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

fn print_record(
    controller: &CatalogController<HttpTransport>,
    record: &CatalogRecord,
    show_images: bool,
) {
    let mut line = format!(
        "  {}  {}",
        record.name().if_supports_color(Stdout, |t| t.bold()),
        format_price(record.price).if_supports_color(Stdout, |t| t.green()),
    );

    if let Some(pct) = discount_percent(record) {
        let was = record
            .original_price
            .map(|p| format!(", was {}", format_price(p)))
            .unwrap_or_default();
        line.push_str(&format!(
            " {}",
            format!("({}% off{})", pct, was).if_supports_color(Stdout, |t| t.yellow())
        ));
    }
    if let Some(rating) = record.rating {
        let reviews = record.review_count.unwrap_or(0);
        line.push_str(&format!("  \u{2605} {:.1} ({})", rating, reviews));
    }
    if !record.in_stock {
        line.push_str(&format!(
            "  {}",
            "out of stock".if_supports_color(Stdout, |t| t.red())
        ));
    }
    log::info!("{}", line);

    if let Some(category) = &record.category {
        log::info!(
            "    {}",
            category.if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    if show_images {
        log::info!(
            "    {}",
            controller
                .image_url(record)
                .if_supports_color(Stdout, |t| t.cyan())
        );
    }
}

/// Rupee amount with Indian digit grouping (`₹1,25,000`).
fn format_price(amount: f64) -> String {
    let total_paise = (amount * 100.0).round() as u64;
    let rupees = (total_paise / 100).to_string();
    let paise = total_paise % 100;

    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let mut groups = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if paise == 0 {
        format!("\u{20B9}{}", grouped)
    } else {
        format!("\u{20B9}{}.{:02}", grouped, paise)
    }
}
