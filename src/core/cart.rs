//! Cart engine - add, remove, update and clear cart lines.
//!
//! Every operation reads the full cart from the store, changes it in memory and
//! writes it back in full before returning. The engine never touches a screen:
//! each mutation returns the signals a presentation layer should act on, in the
//! order they should be handled.

use crate::{
    core::{
        item::{CartItem, Extras, coerce_quantity},
        store::CartStore,
    },
    errors::Result,
};
use tracing::{debug, info, instrument};

/// Something the presentation layer should do after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartSignal {
    /// Badge counter now shows this many units
    BadgeCount(u32),
    /// Cart view is stale and should be rebuilt
    Render,
    /// Cart drawer should open
    OpenDrawer,
    /// Short message confirming an addition
    Confirmation(String),
}

/// Receives signals emitted by the engine.
pub trait CartObserver {
    /// Handles one signal.
    fn on_signal(&self, signal: &CartSignal);
}

/// Hands each signal to `observer`, in order.
pub fn dispatch(observer: &impl CartObserver, signals: &[CartSignal]) {
    for signal in signals {
        observer.on_signal(signal);
    }
}

/// Sum of `price * quantity` over all lines.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> f64 {
    items
        .iter()
        .map(CartItem::subtotal)
        .fold(0.0, |sum, subtotal| sum + subtotal)
}

/// Sum of quantities over all lines.
#[must_use]
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |count, item| count.saturating_add(item.quantity))
}

/// Adds `request` to `items`, merging into an identical line when there is one.
///
/// Returns the position of the affected line.
pub fn merge_line(items: &mut Vec<CartItem>, request: CartItem) -> usize {
    let request = request.normalized();
    if let Some(index) = items
        .iter()
        .position(|line| line.is_same_line(&request.name, request.extras.as_ref()))
    {
        items[index].quantity = items[index].quantity.saturating_add(request.quantity);
        index
    } else {
        items.push(request);
        items.len() - 1
    }
}

/// Cart operations over an injected store.
#[derive(Debug)]
pub struct CartEngine<S> {
    store: S,
}

impl<S: CartStore> CartEngine<S> {
    /// Creates an engine backed by `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current cart contents, in insertion order.
    pub async fn items(&self) -> Result<Vec<CartItem>> {
        self.store.load().await
    }

    /// Adds an item, merging with an identical line or appending a new one.
    ///
    /// Signals: badge count, open drawer, render, confirmation.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn add_item(&self, request: CartItem) -> Result<Vec<CartSignal>> {
        let mut items = self.store.load().await?;
        let name = request.name.clone();
        let added = request.quantity;
        let index = merge_line(&mut items, request);
        info!(
            "Added {} x {} (line {}, now {})",
            added,
            name,
            index + 1,
            items[index].quantity
        );

        let badge = self.persist(&items).await?;
        Ok(vec![
            badge,
            CartSignal::OpenDrawer,
            CartSignal::Render,
            CartSignal::Confirmation(format!("{name} added to cart")),
        ])
    }

    /// Removes every line matching `(name, extras)`. Nothing matching leaves the cart as it was.
    ///
    /// Signals: badge count, render.
    #[instrument(skip(self, extras))]
    pub async fn remove_item(&self, name: &str, extras: Option<&Extras>) -> Result<Vec<CartSignal>> {
        let mut items = self.store.load().await?;
        let before = items.len();
        items.retain(|line| !line.is_same_line(name, extras));
        info!("Removed {} line(s)", before - items.len());

        let badge = self.persist(&items).await?;
        Ok(vec![badge, CartSignal::Render])
    }

    /// Sets the quantity of the matching line to `max(1, quantity)`.
    ///
    /// Text input should go through [`crate::core::item::parse_quantity`] first,
    /// which maps anything non-numeric to 1. When no line matches nothing is
    /// written and no signals are returned.
    #[instrument(skip(self, extras))]
    pub async fn update_quantity(
        &self,
        name: &str,
        extras: Option<&Extras>,
        quantity: i64,
    ) -> Result<Vec<CartSignal>> {
        let mut items = self.store.load().await?;
        let Some(line) = items
            .iter_mut()
            .find(|line| line.is_same_line(name, extras))
        else {
            debug!("No matching line, nothing to update");
            return Ok(Vec::new());
        };

        line.quantity = coerce_quantity(quantity);
        info!("Quantity set to {}", line.quantity);

        let badge = self.persist(&items).await?;
        Ok(vec![badge, CartSignal::Render])
    }

    /// Empties the cart.
    ///
    /// Signals: badge count, render.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<Vec<CartSignal>> {
        let badge = self.persist(&[]).await?;
        info!("Cart cleared");
        Ok(vec![badge, CartSignal::Render])
    }

    /// Sum of `price * quantity` over the stored cart.
    pub async fn total(&self) -> Result<f64> {
        Ok(cart_total(&self.store.load().await?))
    }

    /// Number of units in the stored cart, as shown on the badge.
    pub async fn item_count(&self) -> Result<u32> {
        Ok(total_quantity(&self.store.load().await?))
    }

    async fn persist(&self, items: &[CartItem]) -> Result<CartSignal> {
        self.store.save(items).await?;
        Ok(CartSignal::BadgeCount(total_quantity(items)))
    }
}
