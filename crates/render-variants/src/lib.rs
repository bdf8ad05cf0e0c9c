//! Render-format option records for report exports.
//!
//! Every export format of the report server takes a bag of text options
//! ("device info"). This crate provides:
//!
//! - [`variants`] - One options record per format, plus the [`DeviceInfo`] trait
//! - [`registry`] - Selecting a format by name
//! - [`binder`] - Applying override maps and producing [`ParameterMap`]s
//!
//! # Example
//!
//! ```rust
//! use render_variants::{to_parameter_map, VariantRegistry};
//!
//! let registry = VariantRegistry::new();
//! let pdf = registry
//!     .bind_format("pdf", [("StartPage", Some("1")), ("EndPage", Some("1"))])
//!     .unwrap();
//!
//! let params = to_parameter_map(&pdf);
//! assert_eq!(params.get("StartPage"), Some("1"));
//! assert_eq!(params.get("HumanReadablePDF"), Some("false"));
//! ```

pub mod binder;
pub mod error;
pub mod params;
pub mod registry;
pub mod variants;

pub use binder::{bind, to_parameter_map};
pub use error::{Result, VariantError};
pub use params::ParameterMap;
pub use registry::VariantRegistry;
pub use variants::{
    DeviceInfo, PropertyKind, PropertySpec, RenderFormat, RenderVariant, DISCRIMINATOR_PROPERTY,
};
