//! Type catalog: the search scope both universes are resolved against.
//!
//! A catalog declares every named record and enumeration type of both the
//! product universe and the test-harness mirror universe. It is built once,
//! either programmatically or from a YAML document:
//!
//! ```yaml
//! types:
//!   - name: ReportServer.SortDirectionEnum
//!     kind: enum
//!     members: [None, Ascending, Descending]
//!   - name: ReportServer.ExecutionInfo
//!     kind: record
//!     properties:
//!       - { name: ReportPath, type: string }
//!       - { name: NumPages, type: int }
//!   - name: ReportServer.ExecutionInfo2
//!     kind: record
//!     base: ReportServer.ExecutionInfo
//!     properties:
//!       - { name: PageCountMode, type: string }
//! ```

use crate::types::{TypeName, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Error reading catalog file
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The same qualified name was declared twice
    #[error("Type declared more than once: {0}")]
    DuplicateType(String),

    /// A base type or property type names a type the catalog lacks
    #[error("Type '{owner}' references unknown type '{referenced}'")]
    UnknownType { owner: String, referenced: String },

    /// A record's base is not itself a record, or the base chain loops
    #[error("Type '{owner}' has invalid base '{base}': {reason}")]
    InvalidBase {
        owner: String,
        base: String,
        reason: String,
    },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

// ============================================================================
// Descriptors
// ============================================================================

/// A property declared on a record type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDescriptor {
    /// Property name (case-sensitive)
    pub name: String,

    /// Declared property type
    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// Whether the property has a public getter
    #[serde(default = "default_true")]
    pub readable: bool,

    /// Whether the property has a public setter
    #[serde(default = "default_true")]
    pub writable: bool,
}

fn default_true() -> bool {
    true
}

impl PropertyDescriptor {
    /// A public read-write property.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            readable: true,
            writable: true,
        }
    }

    /// A public get-only property.
    pub fn read_only(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            writable: false,
            ..Self::new(name, ty)
        }
    }

    /// Whether the property takes part in structural copies.
    pub fn is_read_write(&self) -> bool {
        self.readable && self.writable
    }
}

/// Shape of a named type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// Enumeration matched by member name
    Enum { members: Vec<String> },

    /// Record type with named properties
    Record {
        /// Direct base type, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<TypeName>,

        /// Abstract types cannot be instantiated
        #[serde(default, rename = "abstract")]
        is_abstract: bool,

        /// Whether a zero-argument constructor exists
        #[serde(default = "default_true")]
        default_constructor: bool,

        /// Properties declared directly on this type
        #[serde(default)]
        properties: Vec<PropertyDescriptor>,
    },
}

/// A named catalog type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeDescriptor {
    pub name: TypeName,

    #[serde(flatten)]
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// A concrete record with a default constructor and no properties yet.
    pub fn record(name: &str) -> Self {
        Self {
            name: TypeName::parse(name),
            kind: TypeKind::Record {
                base: None,
                is_abstract: false,
                default_constructor: true,
                properties: Vec::new(),
            },
        }
    }

    /// An enumeration with the given members, in declaration order.
    pub fn enumeration<I, S>(name: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: TypeName::parse(name),
            kind: TypeKind::Enum {
                members: members.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Add a read-write property. No-op on enumerations.
    pub fn property(self, name: &str, ty: TypeRef) -> Self {
        self.with_property(PropertyDescriptor::new(name, ty))
    }

    /// Add a get-only property. No-op on enumerations.
    pub fn read_only(self, name: &str, ty: TypeRef) -> Self {
        self.with_property(PropertyDescriptor::read_only(name, ty))
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        if let TypeKind::Record { properties, .. } = &mut self.kind {
            properties.push(property);
        }
        self
    }

    /// Set the direct base type.
    pub fn extends(mut self, base_name: &str) -> Self {
        if let TypeKind::Record { base, .. } = &mut self.kind {
            *base = Some(TypeName::parse(base_name));
        }
        self
    }

    pub fn abstract_type(mut self) -> Self {
        if let TypeKind::Record { is_abstract, .. } = &mut self.kind {
            *is_abstract = true;
        }
        self
    }

    pub fn without_default_constructor(mut self) -> Self {
        if let TypeKind::Record {
            default_constructor,
            ..
        } = &mut self.kind
        {
            *default_constructor = false;
        }
        self
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record { .. })
    }

    /// Enum members, or `None` for records.
    pub fn members(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum { members } => Some(members),
            TypeKind::Record { .. } => None,
        }
    }

    pub fn base(&self) -> Option<&TypeName> {
        match &self.kind {
            TypeKind::Record { base, .. } => base.as_ref(),
            TypeKind::Enum { .. } => None,
        }
    }

    /// Whether the type can be default-constructed.
    pub fn is_constructible(&self) -> bool {
        match &self.kind {
            TypeKind::Record {
                is_abstract,
                default_constructor,
                ..
            } => !is_abstract && *default_constructor,
            TypeKind::Enum { .. } => false,
        }
    }

    fn own_properties(&self) -> &[PropertyDescriptor] {
        match &self.kind {
            TypeKind::Record { properties, .. } => properties,
            TypeKind::Enum { .. } => &[],
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    types: Vec<TypeDescriptor>,
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable set of named types, keyed by qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: BTreeMap<TypeName, TypeDescriptor>,
}

impl TypeCatalog {
    /// Build a catalog, rejecting duplicates and dangling references.
    pub fn new(descriptors: Vec<TypeDescriptor>) -> Result<Self> {
        let mut types = BTreeMap::new();
        for descriptor in descriptors {
            let key = descriptor.name.clone();
            if types.insert(key.clone(), descriptor).is_some() {
                return Err(CatalogError::DuplicateType(key.qualified()));
            }
        }
        let catalog = Self { types };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a catalog from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.types)
    }

    fn validate(&self) -> Result<()> {
        for descriptor in self.types.values() {
            let owner = descriptor.name.qualified();
            if let Some(base) = descriptor.base() {
                match self.types.get(base) {
                    None => {
                        return Err(CatalogError::UnknownType {
                            owner,
                            referenced: base.qualified(),
                        })
                    }
                    Some(b) if !b.is_record() => {
                        return Err(CatalogError::InvalidBase {
                            owner,
                            base: base.qualified(),
                            reason: "base is not a record".to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
            for property in descriptor.own_properties() {
                if let Some(named) = property.ty.innermost_named() {
                    if !self.types.contains_key(named) {
                        return Err(CatalogError::UnknownType {
                            owner,
                            referenced: named.qualified(),
                        });
                    }
                }
            }
            // A base chain longer than the catalog must loop.
            let mut seen = HashSet::new();
            let mut current = descriptor.base();
            while let Some(base) = current {
                if !seen.insert(base) || base == &descriptor.name {
                    return Err(CatalogError::InvalidBase {
                        owner,
                        base: base.qualified(),
                        reason: "base chain is cyclic".to_string(),
                    });
                }
                current = self.types.get(base).and_then(TypeDescriptor::base);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Look up a type by its qualified name.
    pub fn get_qualified(&self, qualified: &str) -> Option<&TypeDescriptor> {
        self.types.get(&TypeName::parse(qualified))
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// All properties of a record, inherited ones first.
    ///
    /// A property redeclared on a derived type keeps the position of the
    /// base declaration but takes the derived descriptor.
    pub fn properties(&self, name: &TypeName) -> Vec<&PropertyDescriptor> {
        let mut chain = Vec::new();
        let mut current = self.get(name);
        while let Some(descriptor) = current {
            chain.push(descriptor);
            current = descriptor.base().and_then(|b| self.get(b));
        }

        let mut result: Vec<&PropertyDescriptor> = Vec::new();
        for descriptor in chain.into_iter().rev() {
            for property in descriptor.own_properties() {
                match result.iter_mut().find(|p| p.name == property.name) {
                    Some(slot) => *slot = property,
                    None => result.push(property),
                }
            }
        }
        result
    }

    /// Whether `derived` strictly extends `base` through its base chain.
    pub fn is_strict_subtype(&self, derived: &TypeName, base: &TypeName) -> bool {
        if derived == base {
            return false;
        }
        let mut current = self.get(derived).and_then(TypeDescriptor::base);
        while let Some(name) = current {
            if name == base {
                return true;
            }
            current = self.get(name).and_then(TypeDescriptor::base);
        }
        false
    }
}
