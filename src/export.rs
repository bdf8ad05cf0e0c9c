//! Render-format commands: listing formats and binding export options.

use anyhow::Context;
use clap::ValueEnum;
use render_variants::{
    to_parameter_map, DeviceInfo, ParameterMap, PropertyKind, RenderVariant, VariantRegistry,
};

/// How a bound parameter map is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON object in declared option order
    #[default]
    Json,
    /// One `Name=Value` line per option
    Pairs,
}

/// Parse a `KEY=VALUE` override. The value may be empty or contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected KEY=VALUE, got '{s}'")),
    }
}

/// Combine `--set` and `--clear` flags into one override list; clears come
/// last so they win over a set of the same key.
pub fn build_overrides(
    sets: &[(String, String)],
    clears: &[String],
) -> Vec<(String, Option<String>)> {
    sets.iter()
        .map(|(k, v)| (k.clone(), Some(v.clone())))
        .chain(clears.iter().map(|k| (k.clone(), None)))
        .collect()
}

/// One line per format: discriminator and option names.
pub fn list_formats(registry: &VariantRegistry) -> Vec<String> {
    registry
        .discover()
        .into_iter()
        .map(|(discriminator, variant)| {
            let options = text_options(&variant).collect::<Vec<_>>().join(", ");
            if options.is_empty() {
                discriminator.to_string()
            } else {
                format!("{discriminator}: {options}")
            }
        })
        .collect()
}

/// Options of one format with their built-in defaults.
pub fn describe_format(registry: &VariantRegistry, literal: &str) -> anyhow::Result<String> {
    let variant = registry.lookup(literal)?;
    let mut out = format!("{} ({})\n", variant.discriminator(), variant.type_name());
    for name in text_options(&variant) {
        match variant.option(name) {
            Some(default) => out.push_str(&format!("  {name} = {default}\n")),
            None => out.push_str(&format!("  {name}\n")),
        }
    }
    Ok(out)
}

/// Look up `literal`, apply overrides, return the parameter map.
pub fn bind_format(
    registry: &VariantRegistry,
    literal: &str,
    overrides: Vec<(String, Option<String>)>,
) -> anyhow::Result<ParameterMap> {
    let variant = registry
        .bind_format(literal, overrides)
        .with_context(|| format!("Failed to bind options for format '{literal}'"))?;
    Ok(to_parameter_map(&variant))
}

pub fn render_parameters(params: &ParameterMap, output: OutputFormat) -> anyhow::Result<String> {
    match output {
        OutputFormat::Json => {
            serde_json::to_string_pretty(params).context("Failed to serialize parameter map")
        }
        OutputFormat::Pairs => Ok(params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn text_options(variant: &RenderVariant) -> impl Iterator<Item = &'static str> {
    variant
        .properties()
        .iter()
        .filter(|p| p.kind == PropertyKind::Text)
        .map(|p| p.name)
}
