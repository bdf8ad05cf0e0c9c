//! Type references for the two mirrored type universes.
//!
//! A type is either one of a handful of primitives, a named catalog type
//! (record or enumeration), or an array of another type. Named types are
//! identified by their qualified name, e.g. `ReportServer.ExecutionInfo`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Qualified name of a catalog type.
///
/// The namespace is everything before the last `.`; the simple name is the
/// remainder. A name without any `.` has an empty namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    namespace: String,
    name: String,
}

impl TypeName {
    /// Build a name from its namespace and simple name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Split a qualified name at its last `.`.
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", qualified),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// The full `Namespace.Name` form.
    pub fn qualified(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl From<&str> for TypeName {
    fn from(qualified: &str) -> Self {
        Self::parse(qualified)
    }
}

impl Serialize for TypeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let qualified = String::deserialize(deserializer)?;
        if qualified.trim().is_empty() {
            return Err(serde::de::Error::custom("type name must not be empty"));
        }
        Ok(Self::parse(&qualified))
    }
}

/// Built-in scalar types shared by both universes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Int,
    Float,
    String,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::String => "string",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "bool" | "boolean" => Some(PrimitiveType::Bool),
            "int" | "long" => Some(PrimitiveType::Int),
            "float" | "double" => Some(PrimitiveType::Float),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a type, as used by property declarations and conversion
/// targets.
///
/// # Text form
///
/// ```text
/// string                          primitive
/// ReportServer.ExecutionInfo      named catalog type
/// ReportServer.Warning[]          array of a named type
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Named(TypeName),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub const BOOL: TypeRef = TypeRef::Primitive(PrimitiveType::Bool);
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveType::Int);
    pub const FLOAT: TypeRef = TypeRef::Primitive(PrimitiveType::Float);
    pub const STRING: TypeRef = TypeRef::Primitive(PrimitiveType::String);

    /// Reference a named catalog type by its qualified name.
    pub fn named(qualified: &str) -> Self {
        TypeRef::Named(TypeName::parse(qualified))
    }

    /// Array whose elements are of type `element`.
    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            TypeRef::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveType::String))
    }

    /// The innermost named type of a (possibly nested) array reference.
    pub fn innermost_named(&self) -> Option<&TypeName> {
        match self {
            TypeRef::Primitive(_) => None,
            TypeRef::Named(name) => Some(name),
            TypeRef::Array(element) => element.innermost_named(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{p}"),
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Array(element) => write!(f, "{element}[]"),
        }
    }
}

impl From<TypeName> for TypeRef {
    fn from(name: TypeName) -> Self {
        TypeRef::Named(name)
    }
}

/// Error returned when a type reference cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid type reference: '{0}'")]
pub struct ParseTypeRefError(pub String);

impl FromStr for TypeRef {
    type Err = ParseTypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(element) = s.strip_suffix("[]") {
            return Ok(TypeRef::array_of(element.parse()?));
        }
        if s.is_empty() || s.contains(char::is_whitespace) || s.contains(['[', ']']) {
            return Err(ParseTypeRefError(s.to_string()));
        }
        match PrimitiveType::from_keyword(s) {
            Some(p) => Ok(TypeRef::Primitive(p)),
            None => Ok(TypeRef::named(s)),
        }
    }
}

// Type references are written as plain strings in catalogs and CLI input.

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct TypeRefVisitor;

        impl Visitor<'_> for TypeRefVisitor {
            type Value = TypeRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a type reference such as \"string\" or \"Ns.Type[]\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TypeRefVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_parse() {
        let name = TypeName::parse("ReportServer.Execution.ExecutionInfo");
        assert_eq!(name.namespace(), "ReportServer.Execution");
        assert_eq!(name.simple_name(), "ExecutionInfo");
        assert_eq!(name.qualified(), "ReportServer.Execution.ExecutionInfo");
    }

    #[test]
    fn test_type_name_without_namespace() {
        let name = TypeName::parse("Standalone");
        assert_eq!(name.namespace(), "");
        assert_eq!(name.to_string(), "Standalone");
    }

    #[test]
    fn test_type_ref_parse() {
        assert_eq!("string".parse::<TypeRef>().unwrap(), TypeRef::STRING);
        assert_eq!("double".parse::<TypeRef>().unwrap(), TypeRef::FLOAT);
        assert_eq!(
            "ReportServer.Warning[]".parse::<TypeRef>().unwrap(),
            TypeRef::array_of(TypeRef::named("ReportServer.Warning"))
        );
        assert_eq!(
            "int[][]".parse::<TypeRef>().unwrap(),
            TypeRef::array_of(TypeRef::array_of(TypeRef::INT))
        );
    }

    #[test]
    fn test_type_ref_parse_rejects_garbage() {
        assert!("".parse::<TypeRef>().is_err());
        assert!("Foo Bar".parse::<TypeRef>().is_err());
        assert!("Foo[".parse::<TypeRef>().is_err());
    }

    #[test]
    fn test_type_ref_display_matches_parse() {
        let ty = TypeRef::array_of(TypeRef::named("Harness.Proxies.Warning"));
        assert_eq!(ty.to_string(), "Harness.Proxies.Warning[]");
        assert_eq!(ty.to_string().parse::<TypeRef>().unwrap(), ty);
    }

    #[test]
    fn test_type_ref_yaml() {
        let ty: TypeRef = serde_yaml::from_str("ReportServer.ParameterValue[]").unwrap();
        assert_eq!(
            ty.innermost_named(),
            Some(&TypeName::parse("ReportServer.ParameterValue"))
        );
        let yaml = serde_yaml::to_string(&TypeRef::INT).unwrap();
        assert_eq!(yaml.trim(), "int");
    }
}
