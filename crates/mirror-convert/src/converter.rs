//! Structural converter between the product and test-harness universes.
//!
//! Conversion rules, in priority order:
//!
//! 1. null converts to null
//! 2. without an explicit target, the target is the runtime type's
//!    counterpart (see [`UnresolvedPolicy`] for when there is none)
//! 3. a value already of the target type is returned as is
//! 4. enum targets match the value's literal against member names
//! 5. string targets take the value's textual representation
//! 6. array targets convert element by element, preserving order
//! 7. if the runtime type's counterpart strictly extends the target, the
//!    counterpart becomes the target, so derived-only fields survive
//! 8. record targets are default-constructed and filled by a [`CopyPlan`]

use crate::error::{ConvertError, Result};
use crate::mirror::Mirror;
use crate::plan::{default_value, CopyPlan, StepAction};
use crate::resolver::{TypeResolver, UniverseConfig};
use mirror_core::{TypeCatalog, TypeName, TypeRef, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What the untyped entry point does when a value's runtime type has no
/// counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Return null. Callers treat a missing mapping as "no value".
    #[default]
    Null,
    /// Fail with [`ConvertError::NoCounterpart`].
    Error,
}

impl std::fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedPolicy::Null => write!(f, "null"),
            UnresolvedPolicy::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for UnresolvedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(UnresolvedPolicy::Null),
            "error" => Ok(UnresolvedPolicy::Error),
            _ => Err(format!("Unknown unresolved policy: {s}")),
        }
    }
}

/// Converter settings supplied once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(flatten)]
    pub universes: UniverseConfig,

    #[serde(default)]
    pub unresolved: UnresolvedPolicy,
}

/// Converts values between the two universes of a [`TypeCatalog`].
///
/// Immutable after construction; share it freely across threads.
#[derive(Debug, Clone)]
pub struct StructuralConverter {
    catalog: TypeCatalog,
    resolver: TypeResolver,
    plans: HashMap<(TypeName, TypeName), CopyPlan>,
    policy: UnresolvedPolicy,
}

impl StructuralConverter {
    pub fn new(catalog: TypeCatalog, config: ConverterConfig) -> Self {
        let resolver = TypeResolver::new(config.universes, &catalog);

        let mut plans = HashMap::new();
        for pair in resolver.pairs() {
            let both_records = [pair.source, pair.counterpart]
                .iter()
                .all(|name| catalog.get(name).is_some_and(|d| d.is_record()));
            if !both_records {
                continue;
            }
            let plan = CopyPlan::build(
                &catalog,
                &TypeRef::Named(pair.source.clone()),
                pair.counterpart,
            );
            let blanked: Vec<_> = plan.blanked().collect();
            if !blanked.is_empty() {
                warn!(
                    "{} -> {}: no source property for {:?}, these will be blanked",
                    pair.source, pair.counterpart, blanked
                );
            }
            plans.insert((pair.source.clone(), pair.counterpart.clone()), plan);
        }

        debug!(
            "Converter ready: {} types, {} pairs, {} copy plans",
            catalog.len(),
            resolver.len(),
            plans.len()
        );

        Self {
            catalog,
            resolver,
            plans,
            policy: config.unresolved,
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    pub fn policy(&self) -> UnresolvedPolicy {
        self.policy
    }

    /// Precomputed plan for a counterpart pair.
    pub fn plan(&self, source: &TypeName, target: &TypeName) -> Option<&CopyPlan> {
        self.plans.get(&(source.clone(), target.clone()))
    }

    /// Convert a value to the counterpart of its runtime type.
    ///
    /// Under [`UnresolvedPolicy::Null`] a value whose type has no
    /// counterpart converts to null.
    pub fn convert(&self, value: Value) -> Result<Value> {
        let Some(runtime) = value.runtime_type() else {
            return Ok(Value::Null);
        };
        match self.resolver.counterpart_ref(&runtime) {
            Some(target) => self.convert_to(value, &target),
            None => match self.policy {
                UnresolvedPolicy::Null => {
                    debug!("No counterpart for {runtime}, converting to null");
                    Ok(Value::Null)
                }
                UnresolvedPolicy::Error => Err(ConvertError::NoCounterpart(runtime.to_string())),
            },
        }
    }

    /// Convert a value to an explicit target type.
    pub fn convert_to(&self, value: Value, target: &TypeRef) -> Result<Value> {
        let Some(runtime) = value.runtime_type() else {
            return Ok(Value::Null);
        };
        if &runtime == target {
            return Ok(value);
        }

        match target {
            TypeRef::Primitive(_) if target.is_string() => Ok(Value::String(value.to_string())),
            TypeRef::Primitive(_) => Err(mismatch(target, &runtime, &value)),
            TypeRef::Array(element) => self.convert_array(value, &runtime, target, element),
            TypeRef::Named(name) => self.convert_named(value, &runtime, name),
        }
    }

    /// Typed entry point: convert into a Rust mirror of a catalog type.
    ///
    /// Unlike [`convert_to`](Self::convert_to), both the value's runtime type
    /// and `T` must belong to one of the two universes.
    pub fn convert_as<T: Mirror>(&self, value: Value) -> Result<Option<T>> {
        let target = T::type_ref();
        let Some(runtime) = value.runtime_type() else {
            return Ok(None);
        };
        self.ensure_in_scope(&runtime, &target)?;
        match self.convert_to(value, &target)? {
            Value::Null => Ok(None),
            converted => T::from_value(converted).map(Some),
        }
    }

    /// Convert one mirror type into another.
    pub fn convert_mirror<S: Mirror, T: Mirror>(&self, source: &S) -> Result<Option<T>> {
        self.convert_as(source.to_value())
    }

    fn ensure_in_scope(&self, runtime: &TypeRef, target: &TypeRef) -> Result<()> {
        let universes = self.resolver.config();
        let outside = if universes.universe_of_ref(runtime).is_none() {
            Some("source type is outside both universes")
        } else if universes.universe_of_ref(target).is_none() {
            Some("target type is outside both universes")
        } else {
            None
        };
        match outside {
            Some(reason) => Err(ConvertError::UnsupportedConversion {
                source_type: runtime.to_string(),
                target_type: target.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn convert_array(
        &self,
        value: Value,
        runtime: &TypeRef,
        target: &TypeRef,
        element: &TypeRef,
    ) -> Result<Value> {
        let items = match value {
            Value::Array { items, .. } => items,
            other => return Err(mismatch(target, runtime, &other)),
        };
        let items = items
            .into_iter()
            .map(|item| self.convert_to(item, element))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::array(element.clone(), items))
    }

    fn convert_named(&self, value: Value, runtime: &TypeRef, target: &TypeName) -> Result<Value> {
        let descriptor = self
            .catalog
            .get(target)
            .ok_or_else(|| ConvertError::UnknownType(target.qualified()))?;

        if let Some(members) = descriptor.members() {
            let literal = value.to_string();
            return if members.iter().any(|m| *m == literal) {
                Ok(Value::enumeration(target.clone(), literal))
            } else {
                Err(mismatch(&TypeRef::Named(target.clone()), runtime, &value))
            };
        }

        if let Some(candidate) = runtime
            .as_named()
            .and_then(|name| self.resolver.counterpart(name))
        {
            if self.catalog.is_strict_subtype(candidate, target) {
                debug!("Narrowing target {target} to {candidate} for {runtime}");
                return self.convert_to(value, &TypeRef::Named(candidate.clone()));
            }
        }

        if !descriptor.is_constructible() {
            let reason = if matches!(
                descriptor.kind,
                mirror_core::TypeKind::Record {
                    is_abstract: true,
                    ..
                }
            ) {
                "type is abstract"
            } else {
                "no zero-argument constructor"
            };
            return Err(ConvertError::ConstructionError {
                type_name: target.qualified(),
                reason: reason.to_string(),
            });
        }

        let plan = match runtime
            .as_named()
            .and_then(|source| self.plan(source, target))
        {
            Some(plan) => Cow::Borrowed(plan),
            None => Cow::Owned(self.ad_hoc_plan(&value, runtime, target)),
        };
        self.copy(value, &plan)
    }

    /// Plan for a pair with no precomputed plan. A record value of a type
    /// the catalog lacks offers its own fields as source properties.
    fn ad_hoc_plan(&self, value: &Value, runtime: &TypeRef, target: &TypeName) -> CopyPlan {
        match (value, runtime.as_named()) {
            (Value::Record { fields, .. }, Some(source)) if !self.catalog.contains(source) => {
                let readable: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
                CopyPlan::with_source_properties(&self.catalog, runtime, target, &readable)
            }
            _ => CopyPlan::build(&self.catalog, runtime, target),
        }
    }

    fn copy(&self, value: Value, plan: &CopyPlan) -> Result<Value> {
        let mut source_fields = match value {
            Value::Record { fields, .. } => fields,
            _ => Vec::new(),
        };

        let mut fields = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let assigned = match step.action {
                StepAction::Copy => match take_field(&mut source_fields, &step.property) {
                    None => default_value(&step.declared, &self.catalog),
                    Some(source_value) => self
                        .convert_to(source_value, &step.declared)
                        .map_err(|e| match e {
                            ConvertError::TypeMismatch { .. } => ConvertError::AssignmentError {
                                source_type: plan.source.to_string(),
                                target_type: plan.target.qualified(),
                                property: step.property.clone(),
                                reason: e.to_string(),
                            },
                            other => other,
                        })?,
                },
                StepAction::Blank | StepAction::Keep => default_value(&step.declared, &self.catalog),
            };
            fields.push((step.property.clone(), assigned));
        }

        Ok(Value::Record {
            ty: plan.target.clone(),
            fields,
        })
    }
}

/// Remove a field from a record value; `None` if the value leaves it out.
fn take_field(fields: &mut Vec<(String, Value)>, name: &str) -> Option<Value> {
    let index = fields.iter().position(|(k, _)| k == name)?;
    Some(fields.swap_remove(index).1)
}

fn mismatch(expected: &TypeRef, found: &TypeRef, value: &Value) -> ConvertError {
    ConvertError::TypeMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
        literal: value.to_string(),
    }
}
