//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use shrine_core::{Family, PriceRange, SortKey};

#[derive(Parser)]
#[command(name = "shrine")]
#[command(about = "Browse and filter the shrine product catalogs", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Query arguments for browsing one family.
#[derive(Args, Clone)]
pub(crate) struct BrowseArgs {
    /// Product family (books, gemstones, yantras, sadhanas)
    pub family: Family,

    /// Exact category to show, or "all"
    #[arg(short, long, default_value = "all")]
    pub category: String,

    /// Price range: "all", "LOW-HIGH" or "LOW+" (e.g., 5000-20000, 50000+)
    #[arg(short, long, default_value = "all")]
    pub price: PriceRange,

    /// Case-insensitive text to look for in names, descriptions and family fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order: popular, price-asc, price-desc, rating, newest
    #[arg(long, default_value = "popular")]
    pub sort: SortKey,

    /// Maximum number of products to print
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print the resolved image URL of each product
    #[arg(long)]
    pub show_images: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the product families and where they are fetched from
    Families,

    /// Fetch a family's catalog and print the filtered, sorted view
    Browse(BrowseArgs),

    /// List the categories of a family's catalog with product counts
    Categories {
        /// Product family (books, gemstones, yantras, sadhanas)
        family: Family,
    },

    /// Manage the catalog configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective configuration and where each value came from
    Show,

    /// Print the config file path
    Path,

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
