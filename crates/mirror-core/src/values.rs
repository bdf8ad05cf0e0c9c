//! Dynamic values carried between the two type universes.
//!
//! Every non-null `Value` knows its runtime type, which is what the
//! converter dispatches on. Records keep their fields in insertion order.

use crate::types::{PrimitiveType, TypeName, TypeRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A value of some catalog or primitive type.
///
/// # JSON form
///
/// Primitives use their natural JSON form. Typed values are objects whose
/// first key names the type:
///
/// ```json
/// {"$type": "ReportServer.ExecutionInfo", "ReportPath": "/Sales", "NumPages": 3}
/// {"$enum": "ReportServer.SortDirectionEnum", "member": "Ascending"}
/// {"$array": "ReportServer.Warning", "items": [ ... ]}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),

    /// Member of a named enumeration
    Enum {
        ty: TypeName,
        member: String,
    },

    /// Homogeneous array
    Array {
        element_type: TypeRef,
        items: Vec<Value>,
    },

    /// Instance of a named record type
    Record {
        ty: TypeName,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn enumeration(ty: impl Into<TypeName>, member: impl Into<String>) -> Self {
        Value::Enum {
            ty: ty.into(),
            member: member.into(),
        }
    }

    pub fn array(element_type: TypeRef, items: Vec<Value>) -> Self {
        Value::Array {
            element_type,
            items,
        }
    }

    /// Create a record from `(field, value)` pairs.
    pub fn record<I, K>(ty: impl Into<TypeName>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record {
            ty: ty.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The runtime type of this value, or `None` for null.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(TypeRef::Primitive(PrimitiveType::Bool)),
            Value::Int(_) => Some(TypeRef::Primitive(PrimitiveType::Int)),
            Value::Float(_) => Some(TypeRef::Primitive(PrimitiveType::Float)),
            Value::String(_) => Some(TypeRef::Primitive(PrimitiveType::String)),
            Value::Enum { ty, .. } | Value::Record { ty, .. } => Some(TypeRef::Named(ty.clone())),
            Value::Array { element_type, .. } => Some(TypeRef::array_of(element_type.clone())),
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the items of an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Look up a record field by its exact name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record { fields, .. } => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Enum member name, if this is an enum value.
    pub fn as_enum_member(&self) -> Option<&str> {
        match self {
            Self::Enum { member, .. } => Some(member),
            _ => None,
        }
    }
}

/// Default textual representation.
///
/// Primitives print their literal, enum values their member name. Arrays and
/// records have no literal form and print their type name instead.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Enum { member, .. } => f.write_str(member),
            Value::Array { element_type, .. } => write!(f, "{element_type}[]"),
            Value::Record { ty, .. } => write!(f, "{ty}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

const TYPE_KEY: &str = "$type";
const ENUM_KEY: &str = "$enum";
const ARRAY_KEY: &str = "$array";

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Enum { ty, member } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(ENUM_KEY, ty)?;
                map.serialize_entry("member", member)?;
                map.end()
            }
            Value::Array {
                element_type,
                items,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(ARRAY_KEY, element_type)?;
                map.serialize_entry("items", items)?;
                map.end()
            }
            Value::Record { ty, fields } => {
                let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
                map.serialize_entry(TYPE_KEY, ty)?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a primitive or a map tagged with $type, $enum or $array")
            }

            fn visit_unit<E: Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_bool<E: Error>(self, b: bool) -> Result<Value, E> {
                Ok(Value::Bool(b))
            }

            fn visit_i64<E: Error>(self, i: i64) -> Result<Value, E> {
                Ok(Value::Int(i))
            }

            fn visit_u64<E: Error>(self, u: u64) -> Result<Value, E> {
                i64::try_from(u)
                    .map(Value::Int)
                    .map_err(|_| E::custom(format!("integer out of range: {u}")))
            }

            fn visit_f64<E: Error>(self, x: f64) -> Result<Value, E> {
                Ok(Value::Float(x))
            }

            fn visit_str<E: Error>(self, s: &str) -> Result<Value, E> {
                Ok(Value::String(s.to_string()))
            }

            fn visit_string<E: Error>(self, s: String) -> Result<Value, E> {
                Ok(Value::String(s))
            }

            // The tag key must come first so the remaining entries can be
            // read in document order.
            fn visit_map<M>(self, mut map: M) -> Result<Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let tag: String = map
                    .next_key()?
                    .ok_or_else(|| M::Error::custom("empty map is not a value"))?;

                match tag.as_str() {
                    TYPE_KEY => {
                        let ty: TypeName = map.next_value()?;
                        let mut fields = Vec::new();
                        while let Some(name) = map.next_key::<String>()? {
                            fields.push((name, map.next_value::<Value>()?));
                        }
                        Ok(Value::Record { ty, fields })
                    }
                    ENUM_KEY => {
                        let ty: TypeName = map.next_value()?;
                        let mut member = None;
                        while let Some(key) = map.next_key::<String>()? {
                            match key.as_str() {
                                "member" => member = Some(map.next_value::<String>()?),
                                other => {
                                    return Err(M::Error::custom(format!(
                                        "unexpected key '{other}' in enum value"
                                    )))
                                }
                            }
                        }
                        let member = member.ok_or_else(|| M::Error::missing_field("member"))?;
                        Ok(Value::Enum { ty, member })
                    }
                    ARRAY_KEY => {
                        let element_type: TypeRef = map.next_value()?;
                        let mut items = None;
                        while let Some(key) = map.next_key::<String>()? {
                            match key.as_str() {
                                "items" => items = Some(map.next_value::<Vec<Value>>()?),
                                other => {
                                    return Err(M::Error::custom(format!(
                                        "unexpected key '{other}' in array value"
                                    )))
                                }
                            }
                        }
                        Ok(Value::Array {
                            element_type,
                            items: items.unwrap_or_default(),
                        })
                    }
                    other => Err(M::Error::custom(format!(
                        "expected '{TYPE_KEY}', '{ENUM_KEY}' or '{ARRAY_KEY}' as first key, found '{other}'"
                    ))),
                }
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
