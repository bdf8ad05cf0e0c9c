//! Error types for variant lookup and binding.

use thiserror::Error;

/// Errors that can occur while selecting or binding a render variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VariantError {
    /// No variant is registered under the requested format name.
    #[error("No render variant found for format '{literal}'")]
    NotFound { literal: String },

    /// Override key matches no property of the variant.
    #[error("Unknown option '{key}' for {variant}")]
    UnknownOption { key: String, variant: String },

    /// Override key matches a property that cannot hold a string.
    #[error("Option '{key}' of {variant} is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        variant: String,
        expected: String,
        found: String,
    },
}

/// Result type for variant operations.
pub type Result<T> = std::result::Result<T, VariantError>;
