//! Argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Cart and PDF receipts for the restaurant menu.
#[derive(Parser, Debug, Clone)]
#[command(name = "menu-cart", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file. A missing file means defaults.
    #[arg(global = true, long, short, default_value = "config.toml")]
    pub config: PathBuf,

    /// What to do with the cart
    #[command(subcommand)]
    pub command: Command,
}

/// Cart subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the configured menu
    Menu,
    /// Add a product, from the menu or ad hoc
    Add(AddArgs),
    /// Remove the line at a position
    Remove {
        /// 1-based line position
        line: usize,
    },
    /// Change the quantity of the line at a position
    Update {
        /// 1-based line position
        line: usize,
        /// New quantity. Anything that is not a positive number means 1.
        quantity: String,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show,
    /// Write the cart as a PDF receipt
    Export,
}

/// Options for `add`.
#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Menu id or product name
    pub item: String,

    /// Quantity to add
    #[arg(long, short)]
    pub quantity: Option<String>,

    /// Unit price, overriding the menu base price
    #[arg(long)]
    pub price: Option<String>,

    /// Menu section, overriding the configured one
    #[arg(long)]
    pub category: Option<String>,

    /// Order type (e.g., "Completa", "Media")
    #[arg(long)]
    pub order_type: Option<String>,

    /// Ingredient to include, repeatable
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,

    /// Free text notes
    #[arg(long)]
    pub comments: Option<String>,
}
