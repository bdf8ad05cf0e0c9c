//! Lookup of render variants by format name.

use crate::binder::bind;
use crate::error::{Result, VariantError};
use crate::variants::{DeviceInfo, RenderFormat, RenderVariant};
use tracing::debug;

/// Registered render formats.
///
/// Holds no variant instances: every lookup builds a fresh record, so
/// concurrent callers never share option state.
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    formats: Vec<RenderFormat>,
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantRegistry {
    /// Registry of every supported format.
    pub fn new() -> Self {
        Self::with_formats(RenderFormat::ALL.iter().copied())
    }

    /// Registry restricted to the given formats.
    pub fn with_formats<I>(formats: I) -> Self
    where
        I: IntoIterator<Item = RenderFormat>,
    {
        let mut unique = Vec::new();
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }
        Self { formats: unique }
    }

    pub fn formats(&self) -> &[RenderFormat] {
        &self.formats
    }

    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.iter().map(RenderFormat::discriminator)
    }

    /// Fresh instances of every registered variant, keyed by discriminator.
    pub fn discover(&self) -> Vec<(&'static str, RenderVariant)> {
        self.formats
            .iter()
            .map(|format| {
                let variant = format.instantiate();
                (variant.discriminator(), variant)
            })
            .collect()
    }

    /// Fresh variant whose discriminator equals `literal`, ignoring case.
    pub fn lookup(&self, literal: &str) -> Result<RenderVariant> {
        self.formats
            .iter()
            .find(|f| f.discriminator().eq_ignore_ascii_case(literal))
            .map(RenderFormat::instantiate)
            .ok_or_else(|| {
                debug!("No render variant for '{literal}'");
                VariantError::NotFound {
                    literal: literal.to_string(),
                }
            })
    }

    /// Look up a variant and apply overrides to it.
    pub fn bind_format<I, K, V>(&self, literal: &str, overrides: I) -> Result<RenderVariant>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut variant = self.lookup(literal)?;
        bind(&mut variant, overrides)?;
        Ok(variant)
    }
}
