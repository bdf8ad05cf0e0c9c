//! Copy plans: the per-pair adapters behind structural copies.
//!
//! A plan lists, in target property order, what happens to each property of
//! the target record when a value of the source type is copied into it.
//! Plans for every counterpart pair are built once when the converter is
//! constructed; other pairs get a plan on demand.

use mirror_core::{TypeCatalog, TypeName, TypeRef, Value};

/// What a structural copy does with one target property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Source has a readable property of the same name: convert and assign.
    Copy,
    /// Source lacks the property: assign the type's default explicitly.
    Blank,
    /// Target property is not read-write: left at its constructed default.
    Keep,
}

/// One target property of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyStep {
    pub property: String,
    pub declared: TypeRef,
    pub action: StepAction,
}

/// Adapter from one source type to one record target.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyPlan {
    pub source: TypeRef,
    pub target: TypeName,
    pub steps: Vec<CopyStep>,
}

impl CopyPlan {
    /// Build the plan for copying `source` into the record `target`.
    ///
    /// A source that is not a catalog record contributes no properties, so
    /// every read-write target property is blanked.
    pub fn build(catalog: &TypeCatalog, source: &TypeRef, target: &TypeName) -> Self {
        let readable: Vec<&str> = match source {
            TypeRef::Named(name) => catalog
                .properties(name)
                .into_iter()
                .filter(|p| p.readable)
                .map(|p| p.name.as_str())
                .collect(),
            _ => Vec::new(),
        };
        Self::with_source_properties(catalog, source, target, &readable)
    }

    /// Build a plan whose source side is given by property name, for record
    /// values whose type the catalog does not declare.
    pub fn with_source_properties(
        catalog: &TypeCatalog,
        source: &TypeRef,
        target: &TypeName,
        readable: &[&str],
    ) -> Self {
        let steps = catalog
            .properties(target)
            .into_iter()
            .map(|property| {
                let action = if !property.is_read_write() {
                    StepAction::Keep
                } else if readable.contains(&property.name.as_str()) {
                    StepAction::Copy
                } else {
                    StepAction::Blank
                };
                CopyStep {
                    property: property.name.clone(),
                    declared: property.ty.clone(),
                    action,
                }
            })
            .collect();

        Self {
            source: source.clone(),
            target: target.clone(),
            steps,
        }
    }

    /// Target properties this plan assigns a default to because the source
    /// has no same-named property.
    pub fn blanked(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .filter(|s| s.action == StepAction::Blank)
            .map(|s| s.property.as_str())
    }
}

/// Default value of a declared type: `false`, `0` and `0.0` for scalar
/// primitives, the first member for enums, null otherwise.
pub fn default_value(ty: &TypeRef, catalog: &TypeCatalog) -> Value {
    use mirror_core::PrimitiveType;

    match ty {
        TypeRef::Primitive(PrimitiveType::Bool) => Value::Bool(false),
        TypeRef::Primitive(PrimitiveType::Int) => Value::Int(0),
        TypeRef::Primitive(PrimitiveType::Float) => Value::Float(0.0),
        TypeRef::Primitive(PrimitiveType::String) => Value::Null,
        TypeRef::Named(name) => catalog
            .get(name)
            .and_then(|d| d.members())
            .and_then(|members| members.first())
            .map_or(Value::Null, |first| Value::enumeration(name.clone(), first.as_str())),
        TypeRef::Array(_) => Value::Null,
    }
}
