//! Entity module - Contains the SeaORM entity definitions for the database.
//! The cart is persisted as a single serialized value per storage key.

pub mod cart_state;

pub use cart_state::{Column as CartStateColumn, Entity as CartState, Model as CartStateModel};
