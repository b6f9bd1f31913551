//! stockcart CLI entry point.
//!
//! # Responsibility
//! - Map command-line arguments onto `InventoryService` calls.
//! - Report load notices and failures as messages instead of panicking.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use stockcart_core::config::{DEFAULT_CART_FILE, DEFAULT_CATALOG_FILE};
use stockcart_core::{default_log_level, init_logging, LogTarget, SearchMode, StorePaths};
use std::path::PathBuf;

/// Inventory catalog and shopping-cart manager.
#[derive(Debug, Parser)]
#[command(name = "stockcart", version, about, long_about = None)]
struct Cli {
    /// Catalog document path.
    #[arg(long, env = "STOCKCART_CATALOG", default_value = DEFAULT_CATALOG_FILE)]
    catalog: PathBuf,

    /// Cart document path.
    #[arg(long, env = "STOCKCART_CART", default_value = DEFAULT_CART_FILE)]
    cart: PathBuf,

    /// Directory receiving catalog backups.
    #[arg(long, env = "STOCKCART_BACKUP_DIR", default_value = ".")]
    backup_dir: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when
    /// omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn paths(&self) -> StorePaths {
        StorePaths::default()
            .with_catalog(self.catalog.clone())
            .with_cart(self.cart.clone())
            .with_backup_dir(self.backup_dir.clone())
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every product with its cart quantity.
    List,
    /// Filter products by substring.
    Search {
        /// Text to look for; empty lists everything.
        query: String,
        /// Field to search: name (name or description), barcode, part-number.
        #[arg(long, default_value = "name")]
        by: SearchMode,
    },
    /// Add a product at the end of the catalog.
    Add(AddArgs),
    /// Delete every product with the given key and its cart entry.
    Delete(KeyArgs),
    /// Add one unit of a product to the cart.
    Inc(KeyArgs),
    /// Remove one unit of a product from the cart.
    Dec(KeyArgs),
    /// Change a product's cart quantity by an arbitrary amount.
    Adjust {
        #[command(flatten)]
        key: KeyArgs,
        /// Signed quantity change.
        #[arg(long, allow_hyphen_values = true)]
        delta: i64,
    },
    /// Show the order summary and total.
    Cart,
    /// Print the cart total.
    Total,
    /// Rewrite the cart document.
    SaveCart,
    /// Empty the cart.
    ClearCart,
    /// Write a timestamped catalog backup.
    Backup,
    /// List existing catalog backups, oldest first.
    Backups,
    /// Replace the catalog with the built-in default products.
    RestoreDefaults,
    /// Replace the catalog with the content of a backup file.
    RestoreBackup {
        /// Backup file to restore.
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product name (required).
    #[arg(long)]
    name: String,
    /// Unit price, greater than zero.
    #[arg(long, allow_hyphen_values = true)]
    price: String,
    #[arg(long, default_value = "")]
    part_number: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Country of origin.
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    barcode: String,
}

/// Product identity, either rendered (`<part number>_<name>`) or split.
#[derive(Debug, Args)]
struct KeyArgs {
    /// Rendered key, e.g. `06008A7F00_Easy Aquatak 110`.
    #[arg(required_unless_present = "name", conflicts_with = "name")]
    key: Option<String>,
    /// Part number (with --name).
    #[arg(long, default_value = "")]
    part_number: String,
    /// Product name.
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    start_logging(&cli)?;

    let paths = cli.paths();
    commands::execute(cli.command, &paths)
}

fn start_logging(cli: &Cli) -> Result<()> {
    let (level, target) = match &cli.log_dir {
        Some(dir) => (
            cli.log_level.as_deref().unwrap_or(default_log_level()),
            LogTarget::Directory(dir.clone()),
        ),
        None => (cli.log_level.as_deref().unwrap_or("warn"), LogTarget::Stderr),
    };
    init_logging(level, target)?;
    Ok(())
}
