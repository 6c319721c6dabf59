//! Unified error types for the cart, its stores and the receipt exporter.
//!
//! Only conditions the caller can act on become an [`Error`]. Malformed
//! persisted state, bad numeric input and unparseable customization
//! configuration are absorbed where they occur and never show up here.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description of the failure
        message: String,
    },

    /// A storage operation against the database failed.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The cart could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the exported receipt failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No PDF capability is available in this build or environment.
    #[error("The PDF generator is not available. The receipt could not be created.")]
    ExportUnavailable,

    /// The PDF backend failed while producing the document.
    #[error("PDF generation failed: {message}")]
    Pdf {
        /// Backend specific failure description
        message: String,
    },

    /// A line number given by the front-end does not exist in the cart.
    #[error("No cart line at position {index}")]
    LineNotFound {
        /// The 1-based position that was requested
        index: usize,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
