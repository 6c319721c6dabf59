//! Core cart logic, independent of how the cart is shown or where it is stored.

/// Cart lines, customization records and numeric coercion
pub mod item;
/// Persistence of the serialized cart
pub mod store;
/// Cart engine - add, remove, update and clear with change signals
pub mod cart;
/// Building cart lines from menu controls
pub mod request;
/// Menu catalog and order-type price rules
pub mod menu;
/// Display snapshot of the cart
pub mod view;
/// Receipt layout and export
pub mod receipt;
/// lopdf rendering backend
#[cfg(feature = "pdf")]
pub mod pdf;
