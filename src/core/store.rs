//! Cart persistence - the storage slot the whole cart lives in.
//!
//! A store has exactly two operations: read the full cart and overwrite it.
//! Reads are tolerant: an empty or unreadable slot is an empty cart, never an
//! error. Only genuine storage failures (the database going away) propagate.

use crate::{
    core::item::CartItem,
    entities::{CartState, cart_state},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use std::future::Future;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Durable storage for the serialized cart.
pub trait CartStore {
    /// Reads the full cart. Missing or malformed content yields an empty list.
    fn load(&self) -> impl Future<Output = Result<Vec<CartItem>>> + Send;

    /// Overwrites the stored cart with `items`.
    fn save(&self, items: &[CartItem]) -> impl Future<Output = Result<()>> + Send;
}

/// Decodes a stored slot value, degrading to an empty cart when it cannot be read.
#[must_use]
pub fn decode_cart(raw: &str) -> Vec<CartItem> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<CartItem>>(raw) {
        Ok(items) => items.into_iter().map(CartItem::normalized).collect(),
        Err(e) => {
            warn!("Stored cart is unreadable, treating it as empty: {}", e);
            Vec::new()
        }
    }
}

/// Serializes the cart for storage.
pub fn encode_cart(items: &[CartItem]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Keeps the serialized slot in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose slot already holds `raw`, valid or not.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
        }
    }

    /// Current raw slot content.
    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

impl CartStore for MemoryStore {
    async fn load(&self) -> Result<Vec<CartItem>> {
        let slot = self.slot.read().await;
        Ok(slot.as_deref().map(decode_cart).unwrap_or_default())
    }

    async fn save(&self, items: &[CartItem]) -> Result<()> {
        let encoded = encode_cart(items)?;
        *self.slot.write().await = Some(encoded);
        Ok(())
    }
}

/// Persists the cart as one row of the `cart_state` table.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
    key: String,
}

impl DatabaseStore {
    /// Creates a store for the slot named `key`. The table must already exist.
    #[must_use]
    pub fn new(db: DatabaseConnection, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    /// The storage key this store reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    async fn find_row(&self) -> Result<Option<cart_state::Model>> {
        CartState::find()
            .filter(cart_state::Column::Key.eq(self.key.as_str()))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }
}

impl CartStore for DatabaseStore {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn load(&self) -> Result<Vec<CartItem>> {
        let row = self.find_row().await?;
        let items = row.map_or_else(Vec::new, |row| decode_cart(&row.value));
        debug!("Loaded {} cart lines", items.len());
        Ok(items)
    }

    #[instrument(skip(self, items), fields(key = %self.key, lines = items.len()))]
    async fn save(&self, items: &[CartItem]) -> Result<()> {
        let value = encode_cart(items)?;
        let now = chrono::Utc::now().naive_utc();

        if let Some(existing) = self.find_row().await? {
            let mut row: cart_state::ActiveModel = existing.into();
            row.value = Set(value);
            row.updated_at = Set(now);
            row.update(&self.db).await?;
        } else {
            let row = cart_state::ActiveModel {
                key: Set(self.key.clone()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            };
            row.insert(&self.db).await?;
        }

        debug!("Saved cart");
        Ok(())
    }
}
