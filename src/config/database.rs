//! Database configuration module.
//!
//! This module handles the `SQLite` connection and creation of the `cart_state`
//! table using `SeaORM`. The table definition comes from the entity model via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust struct.

use crate::entities::CartState;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Fallback used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://menu_cart.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the `cart_state` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut cart_state_table = schema.create_table_from_entity(CartState);
    cart_state_table.if_not_exists();

    db.execute(builder.build(&cart_state_table)).await?;

    Ok(())
}
