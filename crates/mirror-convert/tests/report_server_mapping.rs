//! End-to-end conversions over a small report-server catalog.

use mirror_convert::{
    enum_member, ConvertError, ConverterConfig, Mirror, RecordReader, StructuralConverter,
    UnresolvedPolicy,
};
use mirror_core::{TypeCatalog, TypeDescriptor, TypeRef, Value};

const CATALOG_YAML: &str = r#"
types:
  - name: ReportServer.SortDirectionEnum
    kind: enum
    members: [None, Ascending, Descending]
  - name: Harness.Proxies.SortDirectionEnum
    kind: enum
    members: [None, Ascending, Descending]

  - name: ReportServer.PageCountMode
    kind: enum
    members: [Estimate, Actual]
  - name: Harness.Proxies.PageCountMode
    kind: enum
    members: [Estimate, Actual]

  - name: ReportServer.Warning
    kind: record
    properties:
      - { name: Code, type: string }
      - { name: Severity, type: string }
      - { name: Message, type: string }
  - name: Harness.Proxies.Warning
    kind: record
    properties:
      - { name: Code, type: string }
      - { name: Severity, type: string }
      - { name: Message, type: string }

  - name: ReportServer.ExecutionInfo
    kind: record
    properties:
      - { name: ReportPath, type: string }
      - { name: NumPages, type: int }
      - { name: HasDocumentMap, type: bool }
      - { name: Warnings, type: "ReportServer.Warning[]" }
  - name: ReportServer.ExecutionInfo2
    kind: record
    base: ReportServer.ExecutionInfo
    properties:
      - { name: PageCountMode, type: ReportServer.PageCountMode }
  - name: Harness.Proxies.ExecutionInfo
    kind: record
    properties:
      - { name: ReportPath, type: string }
      - { name: NumPages, type: int }
      - { name: HasDocumentMap, type: bool }
      - { name: Warnings, type: "Harness.Proxies.Warning[]" }
  - name: Harness.Proxies.ExecutionInfo2
    kind: record
    base: Harness.Proxies.ExecutionInfo
    properties:
      - { name: PageCountMode, type: Harness.Proxies.PageCountMode }

  - name: ReportServer.ParameterValue
    kind: record
    properties:
      - { name: Name, type: string }
      - { name: Value, type: string }
      - { name: Label, type: string }
  - name: Harness.Proxies.ParameterValue
    kind: record
    properties:
      - { name: Name, type: string }
      - { name: Value, type: string }

  - name: ReportServer.DataSourceDefinitionOrReference
    kind: record
    abstract: true
  - name: Harness.Proxies.DataSourceDefinitionOrReference
    kind: record
    abstract: true
  - name: ReportServer.DataSourceReference
    kind: record
    base: ReportServer.DataSourceDefinitionOrReference
    properties:
      - { name: Reference, type: string }
  - name: Harness.Proxies.DataSourceReference
    kind: record
    base: Harness.Proxies.DataSourceDefinitionOrReference
    properties:
      - { name: Reference, type: string }

  - name: ReportServer.Schedule
    kind: record
    default_constructor: false
    properties:
      - { name: ScheduleID, type: string }
  - name: Harness.Proxies.Schedule
    kind: record
    default_constructor: false
    properties:
      - { name: ScheduleID, type: string }

  - name: ReportServer.SortSpec
    kind: record
    properties:
      - { name: Field, type: string }
      - { name: Direction, type: ReportServer.SortDirectionEnum }
      - { name: Priority, type: int }
  - name: Harness.Proxies.SortSpec
    kind: record
    properties:
      - { name: Field, type: string }
      - { name: Direction, type: Harness.Proxies.SortDirectionEnum }
      - { name: Priority, type: bool }

  - name: Elsewhere.Note
    kind: record
    properties:
      - { name: Code, type: string }
"#;

fn converter() -> StructuralConverter {
    let catalog = TypeCatalog::from_yaml_str(CATALOG_YAML).unwrap();
    StructuralConverter::new(catalog, ConverterConfig::default())
}

fn product_warning(code: &str) -> Value {
    Value::record(
        "ReportServer.Warning",
        [
            ("Code", Value::from(code)),
            ("Severity", Value::from("Warning")),
            ("Message", Value::from(format!("message for {code}"))),
        ],
    )
}

fn product_execution_info() -> Value {
    Value::record(
        "ReportServer.ExecutionInfo",
        [
            ("ReportPath", Value::from("/Sales/Summary")),
            ("NumPages", Value::from(12)),
            ("HasDocumentMap", Value::from(true)),
            (
                "Warnings",
                Value::array(
                    TypeRef::named("ReportServer.Warning"),
                    vec![product_warning("rsW1"), product_warning("rsW2")],
                ),
            ),
        ],
    )
}

#[test]
fn test_round_trip_restores_fields() {
    let c = converter();
    let original = product_execution_info();

    let harness = c
        .convert_to(original.clone(), &TypeRef::named("Harness.Proxies.ExecutionInfo"))
        .unwrap();
    assert_eq!(
        harness.runtime_type(),
        Some(TypeRef::named("Harness.Proxies.ExecutionInfo"))
    );

    let back = c
        .convert_to(harness, &TypeRef::named("ReportServer.ExecutionInfo"))
        .unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_untyped_convert_resolves_counterpart() {
    let c = converter();
    let harness = c.convert(product_warning("rsW1")).unwrap();
    assert_eq!(
        harness,
        Value::record(
            "Harness.Proxies.Warning",
            [
                ("Code", Value::from("rsW1")),
                ("Severity", Value::from("Warning")),
                ("Message", Value::from("message for rsW1")),
            ],
        )
    );
}

#[test]
fn test_array_preserves_length_and_order() {
    let c = converter();
    let warnings: Vec<Value> = (0..5).map(|i| product_warning(&format!("rs{i}"))).collect();
    let array = Value::array(TypeRef::named("ReportServer.Warning"), warnings.clone());

    let converted = c.convert(array).unwrap();
    let items = converted.as_array().unwrap();
    assert_eq!(items.len(), warnings.len());
    for (item, original) in items.iter().zip(warnings) {
        assert_eq!(item, &c.convert(original).unwrap());
    }
    assert_eq!(
        converted.runtime_type(),
        Some(TypeRef::array_of(TypeRef::named("Harness.Proxies.Warning")))
    );
}

#[test]
fn test_empty_array() {
    let c = converter();
    let converted = c
        .convert(Value::array(TypeRef::named("ReportServer.Warning"), vec![]))
        .unwrap();
    assert_eq!(converted.as_array().map(<[Value]>::len), Some(0));
}

#[test]
fn test_enum_literal_from_string() {
    let c = converter();
    let converted = c
        .convert_to(
            Value::from("Ascending"),
            &TypeRef::named("ReportServer.SortDirectionEnum"),
        )
        .unwrap();
    assert_eq!(
        converted,
        Value::enumeration("ReportServer.SortDirectionEnum", "Ascending")
    );
}

#[test]
fn test_enum_across_universes_matches_by_name() {
    let c = converter();
    let converted = c
        .convert(Value::enumeration(
            "Harness.Proxies.SortDirectionEnum",
            "Descending",
        ))
        .unwrap();
    assert_eq!(
        converted,
        Value::enumeration("ReportServer.SortDirectionEnum", "Descending")
    );
}

#[test]
fn test_enum_unknown_literal_is_type_mismatch() {
    let c = converter();
    let err = c
        .convert_to(
            Value::from("Sideways"),
            &TypeRef::named("ReportServer.SortDirectionEnum"),
        )
        .unwrap_err();
    match err {
        ConvertError::TypeMismatch {
            expected, literal, ..
        } => {
            assert_eq!(expected, "ReportServer.SortDirectionEnum");
            assert_eq!(literal, "Sideways");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_derived_runtime_type_survives_base_target() {
    let c = converter();
    let derived = Value::record(
        "ReportServer.ExecutionInfo2",
        [
            ("ReportPath", Value::from("/Sales/Detail")),
            ("NumPages", Value::from(3)),
            ("HasDocumentMap", Value::from(false)),
            ("Warnings", Value::Null),
            (
                "PageCountMode",
                Value::enumeration("ReportServer.PageCountMode", "Actual"),
            ),
        ],
    );

    let converted = c
        .convert_to(derived, &TypeRef::named("Harness.Proxies.ExecutionInfo"))
        .unwrap();
    assert_eq!(
        converted.runtime_type(),
        Some(TypeRef::named("Harness.Proxies.ExecutionInfo2"))
    );
    assert_eq!(
        converted.field("PageCountMode"),
        Some(&Value::enumeration("Harness.Proxies.PageCountMode", "Actual"))
    );
}

#[test]
fn test_derived_counterpart_into_abstract_base() {
    let c = converter();
    let reference = Value::record(
        "ReportServer.DataSourceReference",
        [("Reference", Value::from("/Data Sources/Sales"))],
    );
    let converted = c
        .convert_to(
            reference,
            &TypeRef::named("Harness.Proxies.DataSourceDefinitionOrReference"),
        )
        .unwrap();
    assert_eq!(
        converted,
        Value::record(
            "Harness.Proxies.DataSourceReference",
            [("Reference", Value::from("/Data Sources/Sales"))],
        )
    );
}

#[test]
fn test_missing_source_property_is_blanked() {
    let c = converter();
    let harness = Value::record(
        "Harness.Proxies.ParameterValue",
        [("Name", Value::from("Year")), ("Value", Value::from("2024"))],
    );
    let product = c.convert(harness).unwrap();
    assert_eq!(product.field("Name"), Some(&Value::from("Year")));
    assert_eq!(product.field("Label"), Some(&Value::Null));

    let plan = c
        .plan(
            &"Harness.Proxies.ParameterValue".into(),
            &"ReportServer.ParameterValue".into(),
        )
        .unwrap();
    assert_eq!(plan.blanked().collect::<Vec<_>>(), vec!["Label"]);
}

#[test]
fn test_missing_value_field_with_primitive_default() {
    let c = converter();
    let sparse = Value::record(
        "ReportServer.ExecutionInfo",
        [("ReportPath", Value::from("/Only/Path"))],
    );
    let converted = c.convert(sparse).unwrap();
    // Fields the value leaves out get the declared type's default.
    assert_eq!(converted.field("ReportPath"), Some(&Value::from("/Only/Path")));
    assert_eq!(converted.field("NumPages"), Some(&Value::Int(0)));
    assert_eq!(converted.field("HasDocumentMap"), Some(&Value::Bool(false)));
    assert_eq!(converted.field("Warnings"), Some(&Value::Null));
}

#[test]
fn test_explicit_null_field_stays_null() {
    let c = converter();
    let value = Value::record(
        "ReportServer.Warning",
        [("Code", Value::from("rsW1")), ("Severity", Value::Null)],
    );
    let converted = c.convert(value).unwrap();
    assert_eq!(converted.field("Severity"), Some(&Value::Null));
    assert_eq!(converted.field("Message"), Some(&Value::Null));
}

#[test]
fn test_abstract_target_without_subtype_fails() {
    let c = converter();
    let err = c
        .convert_to(
            product_warning("rsW1"),
            &TypeRef::named("Harness.Proxies.DataSourceDefinitionOrReference"),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConvertError::ConstructionError {
            type_name: "Harness.Proxies.DataSourceDefinitionOrReference".to_string(),
            reason: "type is abstract".to_string(),
        }
    );
}

#[test]
fn test_missing_default_constructor_fails() {
    let c = converter();
    let schedule = Value::record("ReportServer.Schedule", [("ScheduleID", Value::from("s1"))]);
    let err = c.convert(schedule).unwrap_err();
    assert!(
        matches!(err, ConvertError::ConstructionError { ref type_name, .. } if type_name == "Harness.Proxies.Schedule"),
        "{err:?}"
    );
}

#[test]
fn test_incompatible_property_is_assignment_error() {
    let c = converter();
    let sort = Value::record(
        "ReportServer.SortSpec",
        [
            ("Field", Value::from("Amount")),
            (
                "Direction",
                Value::enumeration("ReportServer.SortDirectionEnum", "Ascending"),
            ),
            ("Priority", Value::from(2)),
        ],
    );
    let err = c.convert(sort).unwrap_err();
    match err {
        ConvertError::AssignmentError {
            source_type,
            target_type,
            property,
            reason,
        } => {
            assert_eq!(source_type, "ReportServer.SortSpec");
            assert_eq!(target_type, "Harness.Proxies.SortSpec");
            assert_eq!(property, "Priority");
            assert!(reason.contains("'2'"), "{reason}");
        }
        other => panic!("expected AssignmentError, got {other:?}"),
    }
}

#[test]
fn test_unrelated_type_untyped_converts_to_null() {
    let c = converter();
    let note = Value::record("Elsewhere.Note", [("Code", Value::from("n1"))]);
    assert_eq!(c.convert(note).unwrap(), Value::Null);
}

#[test]
fn test_error_policy_surfaces_missing_counterpart() {
    let catalog = TypeCatalog::from_yaml_str(CATALOG_YAML).unwrap();
    let c = StructuralConverter::new(
        catalog,
        ConverterConfig {
            unresolved: UnresolvedPolicy::Error,
            ..ConverterConfig::default()
        },
    );
    let note = Value::record("Elsewhere.Note", [("Code", Value::from("n1"))]);
    assert_eq!(
        c.convert(note).unwrap_err(),
        ConvertError::NoCounterpart("Elsewhere.Note".to_string())
    );
}

#[test]
fn test_untyped_explicit_target_copies_unrelated_types() {
    let c = converter();
    let note = Value::record("Elsewhere.Note", [("Code", Value::from("n1"))]);
    let warning = c
        .convert_to(note, &TypeRef::named("Harness.Proxies.Warning"))
        .unwrap();
    assert_eq!(warning.field("Code"), Some(&Value::from("n1")));
    assert_eq!(warning.field("Severity"), Some(&Value::Null));
}

#[test]
fn test_uncatalogued_record_copies_its_own_fields() {
    let c = converter();
    let info = Value::record(
        "Nowhere.Info",
        [
            ("ReportPath", Value::from("/x")),
            ("NumPages", Value::from(3)),
            ("Extra", Value::from("ignored")),
        ],
    );
    let converted = c
        .convert_to(info, &TypeRef::named("Harness.Proxies.ExecutionInfo"))
        .unwrap();
    assert_eq!(converted.field("ReportPath"), Some(&Value::from("/x")));
    assert_eq!(converted.field("NumPages"), Some(&Value::Int(3)));
    assert_eq!(converted.field("HasDocumentMap"), Some(&Value::Bool(false)));
    assert_eq!(converted.field("Extra"), None);
}

#[test]
fn test_uncatalogued_record_field_mismatch_names_property() {
    let c = converter();
    let info = Value::record("Nowhere.Info", [("NumPages", Value::from("three"))]);
    let err = c
        .convert_to(info, &TypeRef::named("Harness.Proxies.ExecutionInfo"))
        .unwrap_err();
    assert!(
        matches!(err, ConvertError::AssignmentError { ref source_type, ref property, .. }
            if source_type == "Nowhere.Info" && property == "NumPages"),
        "{err:?}"
    );
}

// ----------------------------------------------------------------------------
// Typed mirrors
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct ProductWarning {
    code: Option<String>,
    severity: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct HarnessWarning {
    code: Option<String>,
    severity: Option<String>,
    message: Option<String>,
}

macro_rules! warning_mirror {
    ($ty:ident, $name:literal) => {
        impl Mirror for $ty {
            fn type_ref() -> TypeRef {
                TypeRef::named($name)
            }

            fn to_value(&self) -> Value {
                Value::record(
                    $name,
                    [
                        ("Code", Value::from(self.code.clone())),
                        ("Severity", Value::from(self.severity.clone())),
                        ("Message", Value::from(self.message.clone())),
                    ],
                )
            }

            fn from_value(value: Value) -> mirror_convert::Result<Self> {
                let mut reader = RecordReader::open(value, &Self::type_ref())?;
                Ok(Self {
                    code: reader.take_string("Code")?,
                    severity: reader.take_string("Severity")?,
                    message: reader.take_string("Message")?,
                })
            }
        }
    };
}

warning_mirror!(ProductWarning, "ReportServer.Warning");
warning_mirror!(HarnessWarning, "Harness.Proxies.Warning");

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortDirection {
    None,
    Ascending,
    Descending,
}

impl Mirror for SortDirection {
    fn type_ref() -> TypeRef {
        TypeRef::named("Harness.Proxies.SortDirectionEnum")
    }

    fn to_value(&self) -> Value {
        let member = match self {
            SortDirection::None => "None",
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        };
        Value::enumeration("Harness.Proxies.SortDirectionEnum", member)
    }

    fn from_value(value: Value) -> mirror_convert::Result<Self> {
        match enum_member(value, &Self::type_ref())?.as_str() {
            "None" => Ok(SortDirection::None),
            "Ascending" => Ok(SortDirection::Ascending),
            "Descending" => Ok(SortDirection::Descending),
            other => Err(ConvertError::TypeMismatch {
                expected: "Harness.Proxies.SortDirectionEnum".to_string(),
                found: "string".to_string(),
                literal: other.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
struct Note;

impl Mirror for Note {
    fn type_ref() -> TypeRef {
        TypeRef::named("Elsewhere.Note")
    }

    fn to_value(&self) -> Value {
        Value::record("Elsewhere.Note", Vec::<(String, Value)>::new())
    }

    fn from_value(_value: Value) -> mirror_convert::Result<Self> {
        Ok(Note)
    }
}

#[test]
fn test_typed_mirror_conversion() {
    let c = converter();
    let product = ProductWarning {
        code: Some("rsW1".to_string()),
        severity: None,
        message: Some("careful".to_string()),
    };
    let harness: HarnessWarning = c.convert_mirror(&product).unwrap().unwrap();
    assert_eq!(
        harness,
        HarnessWarning {
            code: Some("rsW1".to_string()),
            severity: None,
            message: Some("careful".to_string()),
        }
    );

    let back: ProductWarning = c.convert_mirror(&harness).unwrap().unwrap();
    assert_eq!(back, product);
}

#[test]
fn test_typed_enum_from_product_enum() {
    let c = converter();
    let direction: Option<SortDirection> = c
        .convert_as(Value::enumeration("ReportServer.SortDirectionEnum", "Ascending"))
        .unwrap();
    assert_eq!(direction, Some(SortDirection::Ascending));
}

#[test]
fn test_typed_null_is_none() {
    let c = converter();
    let result: Option<HarnessWarning> = c.convert_as(Value::Null).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_typed_rejects_source_outside_universes() {
    let c = converter();
    let note = Value::record("Elsewhere.Note", [("Code", Value::from("n1"))]);
    let err = c.convert_as::<HarnessWarning>(note).unwrap_err();
    assert!(
        matches!(err, ConvertError::UnsupportedConversion { ref source_type, .. } if source_type == "Elsewhere.Note"),
        "{err:?}"
    );
}

#[test]
fn test_typed_rejects_target_outside_universes() {
    let c = converter();
    let err = c.convert_as::<Note>(product_warning("rsW1")).unwrap_err();
    assert!(
        matches!(err, ConvertError::UnsupportedConversion { ref target_type, .. } if target_type == "Elsewhere.Note"),
        "{err:?}"
    );
}

#[test]
fn test_typed_rejects_primitive_source() {
    let c = converter();
    let err = c.convert_as::<SortDirection>(Value::from("Ascending")).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedConversion { .. }));
}

#[test]
fn test_catalog_from_builder_matches_yaml_semantics() {
    let catalog = TypeCatalog::new(vec![
        TypeDescriptor::record("ReportServer.Warning").property("Code", TypeRef::STRING),
        TypeDescriptor::record("Harness.Proxies.Warning").property("Code", TypeRef::STRING),
    ])
    .unwrap();
    let c = StructuralConverter::new(catalog, ConverterConfig::default());
    let converted = c
        .convert(Value::record(
            "Harness.Proxies.Warning",
            [("Code", Value::from("x"))],
        ))
        .unwrap();
    assert_eq!(
        converted,
        Value::record("ReportServer.Warning", [("Code", Value::from("x"))])
    );
}
