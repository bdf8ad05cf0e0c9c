//! Core types for the report-bridge mapping crates.
//!
//! This crate provides the foundational model shared by the converter and
//! its callers:
//!
//! - [`TypeRef`] / [`TypeName`] - References to primitive, named and array types
//! - [`Value`] - Dynamic values that know their runtime type
//! - [`TypeCatalog`] - The declared types of both universes (the search scope)
//!
//! # Architecture
//!
//! ```text
//! mirror-core (this crate)
//!    │
//!    ├─── mirror-convert   (resolver, copy plans, structural converter)
//!    │
//!    └─── report-bridge    (CLI, configuration)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mirror_core::{TypeCatalog, TypeDescriptor, TypeRef, Value};
//!
//! let catalog = TypeCatalog::new(vec![
//!     TypeDescriptor::record("ReportServer.Warning").property("Code", TypeRef::STRING),
//! ])
//! .unwrap();
//!
//! let warning = Value::record("ReportServer.Warning", [("Code", Value::from("rsWarn"))]);
//! assert!(catalog.contains(&"ReportServer.Warning".into()));
//! assert_eq!(warning.field("Code"), Some(&Value::from("rsWarn")));
//! ```

pub mod catalog;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use catalog::{CatalogError, PropertyDescriptor, TypeCatalog, TypeDescriptor, TypeKind};
pub use types::{ParseTypeRefError, PrimitiveType, TypeName, TypeRef};
pub use values::Value;
