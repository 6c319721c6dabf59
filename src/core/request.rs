//! Item request builder - turns what the menu page knows into a cart line.
//!
//! A menu button carries a product name, a price (number or text), a category,
//! the id of its quantity input and, optionally, a JSON customization config
//! naming the order-type selector, the ingredient checkboxes and the notes
//! field. Reading those controls is delegated to a [`FormState`], so the
//! builder itself never touches a page. A config that cannot be parsed is
//! logged and treated as no customization.

use crate::core::{
    item::{CartItem, Extras, coerce_price, parse_price, parse_quantity},
    menu::MenuCatalog,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::error;

/// A number that may arrive as JSON number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    /// Already numeric
    Number(f64),
    /// Typed or attribute text
    Text(String),
}

impl NumberInput {
    /// Price value, 0 when unreadable.
    #[must_use]
    pub fn as_price(&self) -> f64 {
        match self {
            Self::Number(value) => coerce_price(*value),
            Self::Text(raw) => parse_price(raw),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NumberInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// What an "add to cart" control hands over.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Product name
    pub name: String,
    /// Base price
    #[serde(default)]
    pub price: Option<NumberInput>,
    /// Menu section
    #[serde(default)]
    pub category: String,
    /// Id of the quantity input, if the control has one
    #[serde(default)]
    pub quantity_id: Option<String>,
    /// Raw JSON customization config
    #[serde(default)]
    pub extras: Option<String>,
}

/// One ingredient checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientOption {
    /// Checkbox id
    pub id: String,
    /// Name recorded when checked
    pub name: String,
}

/// Which controls make up a product's customization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationConfig {
    /// Id of the order-type selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type_id: Option<String>,
    /// Ingredient checkboxes, in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientOption>>,
    /// Id of the notes field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_id: Option<String>,
}

/// Read access to the controls on the page.
pub trait FormState {
    /// Current value of a text input or selector, `None` when it does not exist.
    fn value(&self, id: &str) -> Option<String>;

    /// Whether a checkbox exists and is checked.
    fn is_checked(&self, id: &str) -> bool;
}

/// A fixed snapshot of control values.
#[derive(Debug, Clone, Default)]
pub struct StaticForm {
    values: HashMap<String, String>,
    checked: HashSet<String>,
}

impl StaticForm {
    /// Creates a form with no controls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a text input or selector.
    #[must_use]
    pub fn with_value(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(id.into(), value.into());
        self
    }

    /// Marks a checkbox as checked.
    #[must_use]
    pub fn with_checked(mut self, id: impl Into<String>) -> Self {
        self.checked.insert(id.into());
        self
    }
}

impl FormState for StaticForm {
    fn value(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }

    fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }
}

/// Reads the customization described by `config` from the form.
///
/// Returns `None` when the config cannot be parsed.
pub fn read_extras(config: &str, form: &impl FormState) -> Option<Extras> {
    let config: CustomizationConfig = match serde_json::from_str(config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse customization config, ignoring it: {}", e);
            return None;
        }
    };

    let order_type = config
        .order_type_id
        .map(|id| form.value(&id).unwrap_or_default());
    let ingredients = config
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .filter(|option| form.is_checked(&option.id))
        .map(|option| option.name)
        .collect();
    let comments = config
        .comments_id
        .and_then(|id| form.value(&id))
        .unwrap_or_default();

    Some(Extras::new(order_type, ingredients, &comments))
}

/// Builds the cart line for `request`.
///
/// When `menu` has an order-type price rule for this product and the selected
/// order type, that price replaces the request's base price.
pub fn build_item(request: &ItemRequest, form: &impl FormState, menu: &MenuCatalog) -> CartItem {
    let extras = request
        .extras
        .as_deref()
        .and_then(|config| read_extras(config, form));

    let quantity = request
        .quantity_id
        .as_deref()
        .and_then(|id| form.value(id))
        .map_or(1, |raw| parse_quantity(&raw));

    let base_price = request.price.as_ref().map_or(0.0, NumberInput::as_price);
    let order_type = extras.as_ref().and_then(Extras::order_type_label);
    let price = menu
        .rule_price(&request.name, order_type)
        .unwrap_or(base_price);

    CartItem::new(
        request.name.clone(),
        price,
        i64::from(quantity),
        request.category.clone(),
        extras,
    )
}
