//! Conversion command: load a catalog, convert JSON-encoded values.

use crate::BridgeConfig;
use anyhow::Context;
use mirror_convert::StructuralConverter;
use mirror_core::{TypeCatalog, TypeRef, Value};
use std::path::Path;
use tracing::info;

/// Load the catalog at `catalog_path` and build a converter for it.
pub fn load_converter(
    catalog_path: &Path,
    config: &BridgeConfig,
) -> anyhow::Result<StructuralConverter> {
    let catalog = TypeCatalog::from_yaml_file(catalog_path)
        .with_context(|| format!("Failed to load type catalog: {}", catalog_path.display()))?;
    info!(
        "Loaded {} types from {}",
        catalog.len(),
        catalog_path.display()
    );
    let converter = StructuralConverter::new(catalog, config.converter.clone());
    info!(
        "Resolved {} counterpart pairs (unresolved policy: {})",
        converter.resolver().len(),
        converter.policy()
    );
    Ok(converter)
}

/// Convert one JSON-encoded value. Without `target` the value goes to its
/// counterpart in the other universe.
pub fn convert_json(
    converter: &StructuralConverter,
    input: &str,
    target: Option<&TypeRef>,
) -> anyhow::Result<String> {
    let value: Value = serde_json::from_str(input).context("Failed to parse input value")?;
    let converted = match target {
        Some(target) => converter
            .convert_to(value, target)
            .with_context(|| format!("Failed to convert value to {target}"))?,
        None => converter.convert(value).context("Failed to convert value")?,
    };
    serde_json::to_string_pretty(&converted).context("Failed to serialize converted value")
}
