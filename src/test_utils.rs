//! Shared test utilities.
//!
//! Helpers for setting up stores and engines and for building cart lines with
//! sensible defaults.

use crate::{
    core::{
        cart::CartEngine,
        item::{CartItem, Extras},
        store::{DatabaseStore, MemoryStore},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with the `cart_state` table.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An engine over a fresh in-memory store.
#[must_use]
pub fn setup_memory_engine() -> CartEngine<MemoryStore> {
    CartEngine::new(MemoryStore::new())
}

/// An engine over a fresh in-memory database, slot `"test_cart"`.
pub async fn setup_database_engine() -> Result<CartEngine<DatabaseStore>> {
    let db = setup_test_db().await?;
    Ok(CartEngine::new(DatabaseStore::new(db, "test_cart")))
}

/// A customization record with only an order type set.
#[must_use]
pub fn order_type(label: &str) -> Extras {
    Extras::new(Some(label.to_string()), Vec::new(), "")
}

/// Three lines covering no customization, a partial one and a full one.
#[must_use]
pub fn sample_cart() -> Vec<CartItem> {
    vec![
        CartItem::new("Agua fresca", 25.0, 2, "Bebidas", None),
        CartItem::new("Pozole", 95.0, 1, "Caldos", Some(order_type("Completa"))),
        CartItem::new(
            "Tostadas",
            60.0,
            3,
            "Antojitos",
            Some(Extras::new(
                Some("Media".to_string()),
                vec!["Lechuga".to_string(), "Crema".to_string()],
                "sin cebolla",
            )),
        ),
    ]
}
