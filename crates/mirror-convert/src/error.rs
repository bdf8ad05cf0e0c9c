//! Error types for structural conversions.
//!
//! Resolution misses are not errors (see [`crate::resolver`]); everything
//! here signals a mismatch between the declared catalog and the value being
//! converted, and carries the offending type, literal or property.

use thiserror::Error;

/// Errors that can occur during a conversion.
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    /// Literal does not name a member of the target enum, or a primitive
    /// value cannot stand in for another primitive.
    #[error("Type mismatch converting '{literal}' ({found}) to {expected}")]
    TypeMismatch {
        expected: String,
        found: String,
        literal: String,
    },

    /// Target type is abstract or has no zero-argument constructor.
    #[error("Cannot construct {type_name}: {reason}")]
    ConstructionError { type_name: String, reason: String },

    /// A converted property value does not fit the target property.
    #[error("Cannot assign property '{property}' copying {source_type} to {target_type}: {reason}")]
    AssignmentError {
        source_type: String,
        target_type: String,
        property: String,
        reason: String,
    },

    /// Typed entry point used with a type outside both universes.
    #[error("Unsupported conversion of {source_type} to {target_type}: {reason}")]
    UnsupportedConversion {
        source_type: String,
        target_type: String,
        reason: String,
    },

    /// No counterpart exists and the policy forbids the null fallback.
    #[error("No counterpart type found for {0}")]
    NoCounterpart(String),

    /// Target names a type missing from the catalog.
    #[error("Unknown target type: {0}")]
    UnknownType(String),
}

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConvertError>;
