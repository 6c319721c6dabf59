//! Menu catalog - products from config.toml and their order-type price rules.
//!
//! Some dishes are sold in sizes ("completa", "media") with a price per size.
//! Choosing the size changes the unit price the line is added with.

use crate::{
    config::app::MenuItemConfig,
    core::request::{ItemRequest, NumberInput},
    errors::Result,
};

/// Configured menu entries.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    entries: Vec<MenuItemConfig>,
}

impl MenuCatalog {
    /// Wraps the configured entries.
    #[must_use]
    pub const fn new(entries: Vec<MenuItemConfig>) -> Self {
        Self { entries }
    }

    /// All entries in configuration order.
    #[must_use]
    pub fn entries(&self) -> &[MenuItemConfig] {
        &self.entries
    }

    /// Finds an entry by id or display name, ignoring case.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&MenuItemConfig> {
        self.entries
            .iter()
            .find(|entry| entry.id.eq_ignore_ascii_case(key) || entry.name.eq_ignore_ascii_case(key))
    }

    /// Price set by an order-type rule for the product named `name`, if any.
    #[must_use]
    pub fn rule_price(&self, name: &str, order_type: Option<&str>) -> Option<f64> {
        let order_type = order_type?.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.name == name)?
            .prices
            .iter()
            .find(|(label, _)| label.to_lowercase() == order_type)
            .map(|(_, price)| *price)
    }

    /// The request an "add" control for `entry` would hand over.
    ///
    /// The customization config is serialized the way it would sit on the page.
    pub fn request_for(entry: &MenuItemConfig, quantity_id: Option<&str>) -> Result<ItemRequest> {
        let extras = entry
            .customization
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(ItemRequest {
            name: entry.name.clone(),
            price: Some(NumberInput::Number(entry.base_price)),
            category: entry.category.clone(),
            quantity_id: quantity_id.map(str::to_string),
            extras,
        })
    }
}
