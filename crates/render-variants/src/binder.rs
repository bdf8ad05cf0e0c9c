//! Applying override maps to variants, and reading them back out.
//!
//! Override keys match property names ignoring case. A `Some` value sets the
//! option; `None` clears it, which differs from leaving the key out (the
//! built-in default stays). Binding is all-or-nothing: every key is checked
//! before any option is written.

use crate::error::{Result, VariantError};
use crate::params::ParameterMap;
use crate::variants::{DeviceInfo, PropertyKind, PropertySpec};
use tracing::debug;

/// Apply `overrides` to `variant` in place.
pub fn bind<D, I, K, V>(variant: &mut D, overrides: I) -> Result<()>
where
    D: DeviceInfo + ?Sized,
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut assignments = Vec::new();
    for (key, value) in overrides {
        let property = match_property(&*variant, key.as_ref())?;
        assignments.push((property.name, value.map(Into::into)));
    }

    let type_name = variant.type_name();
    for (name, value) in assignments {
        if let Some(slot) = variant.option_mut(name) {
            debug!("{type_name}.{name} = {value:?}");
            *slot = value;
        }
    }
    Ok(())
}

fn match_property<D>(variant: &D, key: &str) -> Result<&'static PropertySpec>
where
    D: DeviceInfo + ?Sized,
{
    let property = variant
        .properties()
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| VariantError::UnknownOption {
            key: key.to_string(),
            variant: variant.type_name().to_string(),
        })?;

    match property.kind {
        PropertyKind::Text => Ok(property),
        PropertyKind::Discriminator => Err(VariantError::TypeMismatch {
            key: key.to_string(),
            variant: variant.type_name().to_string(),
            expected: "string".to_string(),
            found: property.type_name().to_string(),
        }),
    }
}

/// Set options of `variant` as an ordered map.
pub fn to_parameter_map<D>(variant: &D) -> ParameterMap
where
    D: DeviceInfo + ?Sized,
{
    let mut params = ParameterMap::default();
    for property in variant.properties() {
        if property.kind != PropertyKind::Text {
            continue;
        }
        if let Some(value) = variant.option(property.name) {
            params.push(property.name, value);
        }
    }
    params
}
