//! Terminal rendering of the cart and of engine signals.

use crate::core::{
    cart::{CartObserver, CartSignal},
    view::CartView,
};
use std::cell::{Cell, RefCell};

/// Collects what a mutation asks to show, to be printed once the command is done.
#[derive(Debug, Default)]
pub struct TerminalObserver {
    notices: RefCell<Vec<String>>,
    show_cart: Cell<bool>,
}

impl TerminalObserver {
    /// Creates an observer with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending notices, leaving none behind.
    pub fn take_notices(&self) -> Vec<String> {
        self.notices.take()
    }

    /// Whether the cart should be printed, resetting the flag.
    pub fn take_show_cart(&self) -> bool {
        self.show_cart.replace(false)
    }
}

impl CartObserver for TerminalObserver {
    fn on_signal(&self, signal: &CartSignal) {
        match signal {
            CartSignal::BadgeCount(count) => self
                .notices
                .borrow_mut()
                .push(format!("Cart: {count} item(s)")),
            CartSignal::Confirmation(message) => self.notices.borrow_mut().push(message.clone()),
            CartSignal::Render | CartSignal::OpenDrawer => self.show_cart.set(true),
        }
    }
}

/// The cart as printable lines.
#[must_use]
pub fn render_view(view: &CartView) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.lines.len() * 2 + 2);
    if let Some(message) = view.empty_message() {
        lines.push(message.to_string());
    } else {
        lines.push(format!("Cart ({} item(s))", view.item_count));
    }

    for line in &view.lines {
        let category = if line.category.is_empty() {
            String::new()
        } else {
            format!(" [{}]", line.category)
        };
        lines.push(format!(
            "{:>3}. {}{}  {} x {} = {}",
            line.position, line.name, category, line.quantity, line.unit_price, line.subtotal
        ));
        lines.extend(line.details.iter().map(|detail| format!("       {detail}")));
    }

    lines.push(format!("Total: {}", view.total));
    lines
}
