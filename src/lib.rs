//! `MenuCart` - Shopping cart and PDF receipts for a restaurant menu
//!
//! This crate keeps a persistent cart of menu products with optional
//! customization (order type, ingredients, notes), merges identical lines,
//! keeps totals and badge counts current, and exports the cart as a PDF
//! receipt laid out on A4 pages.

#![deny(
    unsafe_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Money is f64; exact comparisons are only allowed in tests
    clippy::float_cmp,

    // Non-test code propagates errors instead of panicking
    clippy::expect_used,
    clippy::panic,
    clippy::unwrap_used,
    clippy::dbg_macro,
    clippy::todo,

    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    rust_2018_idioms,
)]
// Error cases are described on the `Error` variants rather than on every fn
#![allow(clippy::missing_errors_doc)]

/// Command line front-end - subcommands and terminal rendering
pub mod cli;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - framework-agnostic cart, menu, view and receipt operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
