//! Cart view - plain data for whatever draws the cart drawer.
//!
//! Amounts are preformatted with two decimals and the configured currency
//! symbol so the presentation layer only places strings.

use crate::core::{
    cart::{cart_total, total_quantity},
    item::CartItem,
};

/// Shown in place of the lines when the cart has none.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty. Add products from any page.";

/// Formats an amount as `<symbol><amount>` with exactly two decimals.
///
/// Negative zero prints as zero.
#[must_use]
pub fn format_money(symbol: &str, amount: f64) -> String {
    let amount = amount + 0.0;
    format!("{symbol}{amount:.2}")
}

/// Display data for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// 1-based position in the cart
    pub position: usize,
    /// Product name
    pub name: String,
    /// Menu section, possibly empty
    pub category: String,
    /// Formatted unit price
    pub unit_price: String,
    /// Units on this line
    pub quantity: u32,
    /// Formatted `price * quantity`
    pub subtotal: String,
    /// Customization lines, empty when the line has none
    pub details: Vec<String>,
}

/// Display data for the whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Lines in cart order
    pub lines: Vec<CartLineView>,
    /// Formatted cart total
    pub total: String,
    /// Units across all lines
    pub item_count: u32,
}

impl CartView {
    /// Builds the view for `items`.
    #[must_use]
    pub fn from_items(items: &[CartItem], currency_symbol: &str) -> Self {
        let lines = items
            .iter()
            .enumerate()
            .map(|(index, item)| CartLineView {
                position: index + 1,
                name: item.name.clone(),
                category: item.category.clone(),
                unit_price: format_money(currency_symbol, item.price),
                quantity: item.quantity,
                subtotal: format_money(currency_symbol, item.subtotal()),
                details: detail_lines(item),
            })
            .collect();

        Self {
            lines,
            total: format_money(currency_symbol, cart_total(items)),
            item_count: total_quantity(items),
        }
    }

    /// True when there is nothing in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The empty-cart message, when it applies.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_CART_MESSAGE)
    }
}

fn detail_lines(item: &CartItem) -> Vec<String> {
    let Some(extras) = &item.extras else {
        return Vec::new();
    };

    let notes = if extras.comments.is_empty() {
        "-"
    } else {
        extras.comments.as_str()
    };
    vec![
        format!("Order: {}", extras.order_type_label().unwrap_or("-")),
        format!("Ingredients: {}", extras.ingredients.join(", ")),
        format!("Notes: {notes}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_cart;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("$", 0.0), "$0.00");
        assert_eq!(format_money("$", 285.0), "$285.00");
        assert_eq!(format_money("$", 1234.5), "$1234.50");
        assert_eq!(format_money("€", 2.5), "€2.50");
        assert_eq!(format_money("$", -0.0), "$0.00");
    }

    #[test]
    fn test_view_of_sample_cart() {
        let view = CartView::from_items(&sample_cart(), "$");

        assert_eq!(view.lines.len(), 3);
        assert_eq!(view.item_count, 6);
        assert_eq!(view.total, "$325.00");
        assert!(view.empty_message().is_none());

        let agua = &view.lines[0];
        assert_eq!(agua.position, 1);
        assert_eq!(agua.unit_price, "$25.00");
        assert_eq!(agua.subtotal, "$50.00");
        assert!(agua.details.is_empty());

        let pozole = &view.lines[1];
        assert_eq!(
            pozole.details,
            vec!["Order: Completa", "Ingredients: ", "Notes: -"]
        );

        let tostadas = &view.lines[2];
        assert_eq!(
            tostadas.details,
            vec![
                "Order: Media",
                "Ingredients: Lechuga, Crema",
                "Notes: sin cebolla"
            ]
        );
    }

    #[test]
    fn test_view_of_empty_cart() {
        let view = CartView::from_items(&[], "$");
        assert!(view.is_empty());
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.item_count, 0);
        assert_eq!(view.empty_message(), Some(EMPTY_CART_MESSAGE));
    }
}
