//! Application configuration loading from config.toml
//!
//! Every section is optional. A missing file gives the defaults, which match
//! the storage key, receipt title and filename the menu site ships with.

use crate::core::request::CustomizationConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage settings for the cart
    pub cart: CartSettings,
    /// Receipt export settings
    pub receipt: ReceiptSettings,
    /// Menu entries with their price rules
    pub menu: Vec<MenuItemConfig>,
}

/// Where the cart is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CartSettings {
    /// Key of the storage slot holding the serialized cart
    pub storage_key: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: "menu_cart_v1".to_string(),
        }
    }
}

/// Text and output settings for the PDF receipt.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiptSettings {
    /// Title printed at the top of the first page
    pub title: String,
    /// File name the document is delivered under
    pub filename: String,
    /// Prefix for every currency amount
    pub currency_symbol: String,
    /// Directory the CLI writes receipts into
    pub output_dir: String,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            title: "Order - Cart".to_string(),
            filename: "order.pdf".to_string(),
            currency_symbol: "$".to_string(),
            output_dir: ".".to_string(),
        }
    }
}

/// Configuration for a single menu entry
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemConfig {
    /// Short identifier used on the command line (e.g., "pozole")
    pub id: String,
    /// Display name that ends up in the cart
    pub name: String,
    /// Menu section
    #[serde(default)]
    pub category: String,
    /// Price when no order-type rule applies
    #[serde(default)]
    pub base_price: f64,
    /// Order type (e.g., "completa", "media") to price
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
    /// Controls the customer can customize this entry with
    #[serde(default)]
    pub customization: Option<CustomizationConfig>,
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A menu entry is missing its `id` or `name`
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration, falling back to defaults when the file does not exist.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        tracing::info!(
            "No configuration at {}, using defaults",
            path_ref.display()
        );
        return Ok(AppConfig::default());
    }
    load_config(path_ref)
}
