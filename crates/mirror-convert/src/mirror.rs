//! Typed mirrors of catalog types.
//!
//! Rust structs and enums that stand for one catalog type implement
//! [`Mirror`] so callers can use
//! [`StructuralConverter::convert_as`](crate::StructuralConverter::convert_as)
//! instead of handling [`Value`]s directly.

use crate::error::{ConvertError, Result};
use mirror_core::{TypeName, TypeRef, Value};

/// A Rust type mirroring exactly one catalog type.
pub trait Mirror: Sized {
    /// The catalog type this Rust type mirrors.
    fn type_ref() -> TypeRef;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

/// Field-by-field reader used by [`Mirror::from_value`] implementations.
#[derive(Debug)]
pub struct RecordReader {
    ty: TypeName,
    fields: Vec<(String, Value)>,
}

impl RecordReader {
    /// Open a record value, checking that it has the expected type.
    pub fn open(value: Value, expected: &TypeRef) -> Result<Self> {
        match value {
            Value::Record { ty, fields } if expected.as_named() == Some(&ty) => {
                Ok(Self { ty, fields })
            }
            other => Err(ConvertError::TypeMismatch {
                expected: expected.to_string(),
                found: other
                    .runtime_type()
                    .map_or_else(|| "null".to_string(), |t| t.to_string()),
                literal: other.to_string(),
            }),
        }
    }

    /// Remove a field; missing fields read as null.
    pub fn take(&mut self, name: &str) -> Value {
        match self.fields.iter().position(|(k, _)| k == name) {
            Some(index) => self.fields.remove(index).1,
            None => Value::Null,
        }
    }

    pub fn take_string(&mut self, name: &str) -> Result<Option<String>> {
        match self.take(name) {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(self.field_mismatch(name, "string", &other)),
        }
    }

    pub fn take_i64(&mut self, name: &str) -> Result<i64> {
        match self.take(name) {
            Value::Null => Ok(0),
            Value::Int(i) => Ok(i),
            other => Err(self.field_mismatch(name, "int", &other)),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> Result<bool> {
        match self.take(name) {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            other => Err(self.field_mismatch(name, "bool", &other)),
        }
    }

    /// Read a nested mirror; null reads as `None`.
    pub fn take_mirror<T: Mirror>(&mut self, name: &str) -> Result<Option<T>> {
        match self.take(name) {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    /// Read an array of mirrors; null reads as empty.
    pub fn take_mirrors<T: Mirror>(&mut self, name: &str) -> Result<Vec<T>> {
        match self.take(name) {
            Value::Null => Ok(Vec::new()),
            Value::Array { items, .. } => items.into_iter().map(T::from_value).collect(),
            other => Err(self.field_mismatch(name, "array", &other)),
        }
    }

    fn field_mismatch(&self, name: &str, expected: &str, value: &Value) -> ConvertError {
        ConvertError::TypeMismatch {
            expected: format!("{expected} for {}.{name}", self.ty),
            found: value
                .runtime_type()
                .map_or_else(|| "null".to_string(), |t| t.to_string()),
            literal: value.to_string(),
        }
    }
}

/// Read the member name of an enum value of the expected type.
pub fn enum_member(value: Value, expected: &TypeRef) -> Result<String> {
    match value {
        Value::Enum { ty, member } if expected.as_named() == Some(&ty) => Ok(member),
        other => Err(ConvertError::TypeMismatch {
            expected: expected.to_string(),
            found: other
                .runtime_type()
                .map_or_else(|| "null".to_string(), |t| t.to_string()),
            literal: other.to_string(),
        }),
    }
}
