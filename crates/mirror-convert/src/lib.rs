//! Structural conversion between the product and test-harness universes.
//!
//! The two universes model the same report-server API as parallel type
//! hierarchies related only by naming. This crate pairs them up once and
//! copies values across by property name.
//!
//! # Modules
//!
//! - [`resolver`] - Counterpart resolution by naming convention
//! - [`plan`] - Per-pair copy plans
//! - [`converter`] - The [`StructuralConverter`] itself
//! - [`mirror`] - Typed entry point for Rust mirrors of catalog types
//!
//! # Example
//!
//! ```rust
//! use mirror_convert::{ConverterConfig, StructuralConverter};
//! use mirror_core::{TypeCatalog, TypeDescriptor, TypeRef, Value};
//!
//! let catalog = TypeCatalog::new(vec![
//!     TypeDescriptor::record("ReportServer.Warning").property("Code", TypeRef::STRING),
//!     TypeDescriptor::record("Harness.Proxies.Warning").property("Code", TypeRef::STRING),
//! ])
//! .unwrap();
//! let converter = StructuralConverter::new(catalog, ConverterConfig::default());
//!
//! let product = Value::record("ReportServer.Warning", [("Code", Value::from("rsWarn"))]);
//! let harness = converter.convert(product).unwrap();
//! assert_eq!(harness.runtime_type(), Some(TypeRef::named("Harness.Proxies.Warning")));
//! ```

pub mod converter;
pub mod error;
pub mod mirror;
pub mod plan;
pub mod resolver;

pub use converter::{ConverterConfig, StructuralConverter, UnresolvedPolicy};
pub use error::{ConvertError, Result};
pub use mirror::{enum_member, Mirror, RecordReader};
pub use plan::{CopyPlan, CopyStep, StepAction};
pub use resolver::{resolve_counterpart, TypePair, TypeResolver, TypeUniverse, UniverseConfig};
