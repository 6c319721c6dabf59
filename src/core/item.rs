//! Cart line model - what one entry in the cart looks like and when two entries are the same.
//!
//! A line is identified by its product name together with its customization
//! record. Equality of the customization is structural over the typed fields,
//! so field order in any serialized form never matters. Numeric input is coerced
//! here rather than rejected: a bad price becomes 0 and a bad quantity becomes 1.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Optional per-line customization chosen by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extras {
    /// Order-size variant (e.g., "Completa", "Media")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    /// Selected ingredients, in selection order
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Free-text notes
    #[serde(default)]
    pub comments: String,
}

impl Extras {
    /// Builds a customization record, trimming the notes.
    #[must_use]
    pub fn new(order_type: Option<String>, ingredients: Vec<String>, comments: &str) -> Self {
        Self {
            order_type,
            ingredients,
            comments: comments.trim().to_string(),
        }
    }

    /// Order type, if one was chosen and is not blank.
    #[must_use]
    pub fn order_type_label(&self) -> Option<&str> {
        self.order_type.as_deref().filter(|value| !value.is_empty())
    }
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name, part of the line identity
    pub name: String,
    /// Unit price, never negative
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    /// Number of units, at least 1
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    /// Menu section label
    #[serde(default)]
    pub category: String,
    /// Customization, part of the line identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Extras>,
}

const fn default_quantity() -> u32 {
    1
}

/// Reads a stored price from any JSON value; `null`, negatives and non-numbers are 0.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().map_or(0.0, coerce_price),
        Value::String(raw) => parse_price(&raw),
        _ => 0.0,
    })
}

/// Reads a stored quantity from any JSON value; fractions truncate, anything unusable is 1.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .map_or_else(|| number.as_f64().map_or(1, quantity_from_float), coerce_quantity),
        Value::String(raw) => parse_quantity(&raw),
        _ => 1,
    })
}

impl CartItem {
    /// Creates a line, coercing price and quantity to safe values.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: f64,
        quantity: i64,
        category: impl Into<String>,
        extras: Option<Extras>,
    ) -> Self {
        Self {
            name: name.into(),
            price: coerce_price(price),
            quantity: coerce_quantity(quantity),
            category: category.into(),
            extras,
        }
    }

    /// Returns true when this line has the given identity.
    #[must_use]
    pub fn is_same_line(&self, name: &str, extras: Option<&Extras>) -> bool {
        self.name == name && self.extras.as_ref() == extras
    }

    /// `price * quantity`
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Re-applies the price and quantity coercion, used on data read back from storage.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.price = coerce_price(self.price);
        self.quantity = self.quantity.max(1);
        self
    }
}

/// Maps NaN, infinities and negative prices to 0.
#[must_use]
pub fn coerce_price(price: f64) -> f64 {
    if price.is_finite() && price >= 0.0 {
        price
    } else {
        0.0
    }
}

/// Clamps a quantity into `1..=u32::MAX`.
#[must_use]
pub fn coerce_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

/// Parses a price typed or sent as text; anything unreadable is 0.
#[must_use]
pub fn parse_price(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map_or(0.0, coerce_price)
}

/// Parses a quantity typed or sent as text; anything unreadable is 1.
///
/// Fractional input is truncated toward zero before clamping.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if let Ok(whole) = trimmed.parse::<i64>() {
        return coerce_quantity(whole);
    }
    trimmed.parse::<f64>().map_or(1, quantity_from_float)
}

/// Truncates toward zero and clamps; non-finite values are 1.
fn quantity_from_float(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    // Cast safety: `as` saturates, and truncation is the intended rounding.
    #[allow(clippy::cast_possible_truncation)]
    let whole = value.trunc() as i64;
    coerce_quantity(whole)
}
