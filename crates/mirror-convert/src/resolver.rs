//! Counterpart resolution between the product and test-harness universes.
//!
//! The two universes share no interface, only a naming convention:
//!
//! ```text
//! product:  <product namespace>.ExecutionInfo      (namespace starts with product_prefix)
//! harness:  <test_prefix>ExecutionInfo             (qualified name starts with test_prefix)
//! ```
//!
//! If `test_prefix` does not end at a namespace boundary, the trailing part
//! (for example `Rs` in `Harness.Proxies.Rs`) is a marker glued onto the
//! harness simple name and is stripped when mapping back.
//!
//! [`resolve_counterpart`] is the pure naming rule. [`TypeResolver`] applies
//! it once to every catalog type and keeps the resulting pairing table.

use mirror_core::{TypeCatalog, TypeName, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which side of the mirror a type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeUniverse {
    Product,
    TestHarness,
}

impl std::fmt::Display for TypeUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeUniverse::Product => write!(f, "product"),
            TypeUniverse::TestHarness => write!(f, "test-harness"),
        }
    }
}

/// Namespace configuration of the two universes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Namespace prefix of product types
    #[serde(default = "default_product_prefix")]
    pub product_prefix: String,

    /// Qualified-name prefix of test-harness types
    #[serde(default = "default_test_prefix")]
    pub test_prefix: String,

    /// Namespace product counterparts of harness types live in
    #[serde(default = "default_target_namespace")]
    pub target_namespace: String,
}

fn default_product_prefix() -> String {
    "ReportServer".to_string()
}

fn default_test_prefix() -> String {
    "Harness.Proxies.".to_string()
}

fn default_target_namespace() -> String {
    "ReportServer".to_string()
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            product_prefix: default_product_prefix(),
            test_prefix: default_test_prefix(),
            target_namespace: default_target_namespace(),
        }
    }
}

impl UniverseConfig {
    pub fn new(
        product_prefix: impl Into<String>,
        test_prefix: impl Into<String>,
        target_namespace: impl Into<String>,
    ) -> Self {
        Self {
            product_prefix: product_prefix.into(),
            test_prefix: test_prefix.into(),
            target_namespace: target_namespace.into(),
        }
    }

    /// Marker the harness prefix glues onto simple names (may be empty).
    pub fn marker(&self) -> &str {
        match self.test_prefix.rsplit_once('.') {
            Some((_, marker)) => marker,
            None => &self.test_prefix,
        }
    }

    /// Universe of a named type, or `None` if it belongs to neither.
    pub fn universe_of(&self, name: &TypeName) -> Option<TypeUniverse> {
        if name.namespace().starts_with(&self.product_prefix) {
            Some(TypeUniverse::Product)
        } else if name.qualified().starts_with(&self.test_prefix) {
            Some(TypeUniverse::TestHarness)
        } else {
            None
        }
    }

    /// Universe of a type reference. Arrays belong to their element's
    /// universe; primitives belong to neither.
    pub fn universe_of_ref(&self, ty: &TypeRef) -> Option<TypeUniverse> {
        match ty {
            TypeRef::Primitive(_) => None,
            TypeRef::Named(name) => self.universe_of(name),
            TypeRef::Array(element) => self.universe_of_ref(element),
        }
    }

    /// Counterpart name by the naming convention alone, without checking
    /// that it exists.
    pub fn candidate_for(&self, source: &TypeName) -> Option<TypeName> {
        match self.universe_of(source)? {
            TypeUniverse::Product => Some(TypeName::parse(&format!(
                "{}{}",
                self.test_prefix,
                source.simple_name()
            ))),
            TypeUniverse::TestHarness => {
                let simple = source.simple_name();
                let stripped = simple.strip_prefix(self.marker()).unwrap_or(simple);
                Some(TypeName::new(self.target_namespace.as_str(), stripped))
            }
        }
    }
}

/// Resolve the counterpart of `source` in `scope`.
///
/// Returns `None` when `source` is in neither universe or the candidate name
/// is not declared in the scope. Never fails.
pub fn resolve_counterpart(
    source: &TypeName,
    config: &UniverseConfig,
    scope: &TypeCatalog,
) -> Option<TypeName> {
    let candidate = config.candidate_for(source)?;
    scope.contains(&candidate).then_some(candidate)
}

/// An association between a type and its counterpart in the other universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypePair<'a> {
    pub source: &'a TypeName,
    pub counterpart: &'a TypeName,
}

/// Pairing table computed once from a catalog.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    config: UniverseConfig,
    pairs: HashMap<TypeName, TypeName>,
}

impl TypeResolver {
    pub fn new(config: UniverseConfig, catalog: &TypeCatalog) -> Self {
        let mut pairs = HashMap::new();
        for descriptor in catalog.iter() {
            match resolve_counterpart(&descriptor.name, &config, catalog) {
                Some(counterpart) => {
                    debug!("Paired {} -> {}", descriptor.name, counterpart);
                    pairs.insert(descriptor.name.clone(), counterpart);
                }
                None => debug!("No counterpart for {}", descriptor.name),
            }
        }
        Self { config, pairs }
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Counterpart of a named type, if one was found at construction.
    pub fn counterpart(&self, name: &TypeName) -> Option<&TypeName> {
        self.pairs.get(name)
    }

    /// Counterpart of a type reference; arrays resolve through their
    /// element type, primitives never resolve.
    pub fn counterpart_ref(&self, ty: &TypeRef) -> Option<TypeRef> {
        match ty {
            TypeRef::Primitive(_) => None,
            TypeRef::Named(name) => self.counterpart(name).cloned().map(TypeRef::Named),
            TypeRef::Array(element) => self.counterpart_ref(element).map(TypeRef::array_of),
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = TypePair<'_>> {
        self.pairs.iter().map(|(source, counterpart)| TypePair {
            source,
            counterpart,
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
