//! Conversion laws every descriptor must satisfy.

use serde_json::json;

use std::collections::BTreeMap;

use repr_core::types::SchemaError;
use repr_core::{
    Declaration, Nested, Registry, ReprConfig, ReprError, Representable, Representation,
    UnknownFieldPolicy, Value,
};

use super::helpers::{representation, sample_model, Endpoint, Model, ModelVersion, Operation, Status};

#[test]
fn test_round_trip_full_model() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let model = sample_model();
    let bytes = repr.to_wire(&model).unwrap();
    let decoded: Model = repr.from_wire(&bytes).unwrap();
    assert_eq!(decoded, model);
}

#[test]
fn test_round_trip_keeps_unset_and_zero_apart() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let unset = Operation {
        name: Some("operations/1".to_string()),
        ..Operation::default()
    };
    let zero = Operation {
        name: Some("operations/1".to_string()),
        done: Some(false),
        ..Operation::default()
    };

    let unset_json = repr.to_json_value(&unset).unwrap();
    let zero_json = repr.to_json_value(&zero).unwrap();
    assert_eq!(unset_json, json!({"name": "operations/1", "done": null}));
    assert_eq!(zero_json, json!({"name": "operations/1", "done": false}));

    assert_eq!(repr.from_json_value::<Operation>(&unset_json).unwrap(), unset);
    assert_eq!(repr.from_json_value::<Operation>(&zero_json).unwrap(), zero);

    // An ordinary optional field keeps the same distinction.
    let empty_name = Operation {
        name: Some(String::new()),
        done: Some(true),
        ..Operation::default()
    };
    let bytes = repr.to_wire(&empty_name).unwrap();
    assert_eq!(repr.from_wire::<Operation>(&bytes).unwrap(), empty_name);
}

#[test]
fn test_numeric_precision() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let model = Model {
        size_bytes: Some(9_223_372_036_854_775_807),
        ..Model::default()
    };
    let json = repr.to_json_value(&model).unwrap();
    assert_eq!(json["sizeBytes"], json!("9223372036854775807"));

    let decoded: Model = repr.from_json_value(&json).unwrap();
    assert_eq!(decoded.size_bytes, Some(i64::MAX));

    let version = ModelVersion {
        sample_count: Some(vec![u64::MAX]),
        ..ModelVersion::default()
    };
    let json = repr.to_json_value(&version).unwrap();
    assert_eq!(json, json!({"sampleCount": ["18446744073709551615"]}));
}

#[test]
fn test_bytes_base64() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let model = Model {
        etag: Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        ..Model::default()
    };
    let json = repr.to_json_value(&model).unwrap();
    assert_eq!(json, json!({"etag": "3q2+7w==", "deployed": null}));

    let decoded: Model = repr.from_json_value(&json).unwrap();
    assert_eq!(decoded.etag, Some(vec![0xDE, 0xAD, 0xBE, 0xEF]));

    // URL-safe, unpadded input from other clients is accepted too.
    let decoded: Model = repr.from_json_value(&json!({"etag": "3q2-7w"})).unwrap();
    assert_eq!(decoded.etag, Some(vec![0xDE, 0xAD, 0xBE, 0xEF]));
}

#[test]
fn test_absent_null_and_empty() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let untouched = ModelVersion::default();
    assert_eq!(repr.to_json_value(&untouched).unwrap(), json!({}));

    let empty = ModelVersion {
        scores: Some(Vec::new()),
        ..ModelVersion::default()
    };
    assert_eq!(repr.to_json_value(&empty).unwrap(), json!({"scores": []}));

    let nulled = Operation {
        error: Some(Nested::Null),
        ..Operation::default()
    };
    assert_eq!(
        repr.to_json_value(&nulled).unwrap(),
        json!({"done": null, "error": null})
    );

    let decoded: ModelVersion = repr.from_json_value(&json!({"scores": null})).unwrap();
    assert_eq!(decoded.scores, None);
    let decoded: ModelVersion = repr.from_json_value(&json!({"scores": []})).unwrap();
    assert_eq!(decoded.scores, Some(Vec::new()));
    let decoded: Operation = repr.from_json_value(&json!({"error": null})).unwrap();
    assert_eq!(decoded.error, Some(Nested::Null));
}

#[test]
fn test_unknown_fields_forward_compatible() {
    let registry = Registry::new();
    let doc = json!({
        "uri": "https://example.invalid",
        "addedInV2": {"nested": [1, 2, 3]},
        "port": 8443
    });

    let repr = representation(&registry);
    let endpoint: Endpoint = repr.from_json_value(&doc).unwrap();
    assert_eq!(endpoint.uri.as_deref(), Some("https://example.invalid"));
    assert_eq!(endpoint.port, Some(8443));

    let strict = Representation::with_registry(
        &registry,
        ReprConfig {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..ReprConfig::default()
        },
    );
    let err = strict.from_json_value::<Endpoint>(&doc).unwrap_err();
    assert!(matches!(err, ReprError::UnknownField { ref wire_key, .. } if wire_key == "addedInV2"));
}

#[test]
fn test_declaration_order() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let mut status = Status::default();
    status.details = Some(vec![Value::from("retry")]);
    status.message = Some("unavailable".to_string());
    status.code = Some(14);

    let text = repr.to_json_string(&status).unwrap();
    assert_eq!(text, r#"{"code":14,"message":"unavailable","details":["retry"]}"#);
}

#[test]
fn test_type_mismatch_is_reported() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let err = repr
        .from_json_value::<Endpoint>(&json!({"port": "443"}))
        .unwrap_err();
    assert_eq!(
        err,
        ReprError::FieldType {
            type_name: "Endpoint".to_string(),
            field: "port".to_string(),
            wire_key: "port".to_string(),
            expected: "uint32".to_string(),
            observed: "string".to_string(),
        }
    );

    let err = repr
        .from_json_value::<Model>(&json!({"versions": [{"scores": [true]}]}))
        .unwrap_err();
    assert!(matches!(
        err,
        ReprError::FieldType { ref type_name, ref field, .. }
            if type_name == "ModelVersion" && field == "scores"
    ));
}

#[test]
fn test_reserved_key_is_escaped() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let model = Model {
        type_url: Some("type.googleapis.com/Model".to_string()),
        ..Model::default()
    };
    let tagged = repr.to_wire_tagged(&model).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&tagged).unwrap();
    assert_eq!(json["@type"], json!("Model"));
    assert_eq!(json["_@type"], json!("type.googleapis.com/Model"));

    let decoded: Model = repr.from_wire_tagged(&tagged).unwrap();
    assert_eq!(decoded, model);

    let field = registry.describe_field::<Model>("@type").unwrap();
    assert_eq!(field.wire_key, "_@type");
}

#[test]
fn test_raw_values_pass_through() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let doc = json!({
        "done": true,
        "response": {"@type": "Model", "weights": [0.25, null, "x"], "n": 18446744073709551615u64}
    });
    let op: Operation = repr.from_json_value(&doc).unwrap();
    assert_eq!(
        op.response.as_ref().and_then(|r| r.get("@type")).and_then(Value::as_str),
        Some("Model")
    );
    assert_eq!(repr.to_json_value(&op).unwrap(), doc);
}

#[test]
fn test_declared_key_of_aliased_field_decodes() {
    let registry = Registry::new();
    let doc = json!({"name": "m", "@type": "type.googleapis.com/Model"});

    let decoded: Model = representation(&registry).from_json_value(&doc).unwrap();
    assert_eq!(decoded.type_url.as_deref(), Some("type.googleapis.com/Model"));
    assert_eq!(decoded.name.as_deref(), Some("m"));

    let strict = Representation::with_registry(&registry, ReprConfig::strict());
    let decoded: Model = strict.from_json_value(&doc).unwrap();
    assert_eq!(decoded.type_url.as_deref(), Some("type.googleapis.com/Model"));

    // The escaped key keeps working.
    let decoded: Model = strict
        .from_json_value(&json!({"_@type": "type.googleapis.com/Model"}))
        .unwrap();
    assert_eq!(decoded.type_url.as_deref(), Some("type.googleapis.com/Model"));
}

#[test]
fn test_raw_object_keeps_key_order() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let text = r#"{"done":true,"response":{"zeta":1,"alpha":{"b":2,"a":1}}}"#;
    let op: Operation = repr.from_json_str(text).unwrap();
    assert_eq!(repr.to_json_string(&op).unwrap(), text);
}

#[derive(Debug, Default, PartialEq)]
struct AlwaysObject {
    parent: Option<Nested<Status>>,
}

impl Representable for AlwaysObject {
    const TYPE_NAME: &'static str = "AlwaysObject";

    fn declare(decl: &mut Declaration<Self>) {
        decl.object("parent", "parent", |a| &a.parent, |a| &mut a.parent)
            .always_emit();
    }
}

#[derive(Debug, Default, PartialEq)]
struct AlwaysRaw {
    payload: Option<Value>,
}

impl Representable for AlwaysRaw {
    const TYPE_NAME: &'static str = "AlwaysRaw";

    fn declare(decl: &mut Declaration<Self>) {
        decl.property("payload", "payload", |a| &a.payload, |a| &mut a.payload)
            .always_emit();
    }
}

#[derive(Debug, Default, PartialEq)]
struct AlwaysContainers {
    details: Option<Vec<Value>>,
    labels: Option<BTreeMap<String, String>>,
    children: Option<Vec<Status>>,
}

impl Representable for AlwaysContainers {
    const TYPE_NAME: &'static str = "AlwaysContainers";

    fn declare(decl: &mut Declaration<Self>) {
        decl.collection("details", "details", |a| &a.details, |a| &mut a.details)
            .always_emit();
        decl.hash("labels", "labels", |a| &a.labels, |a| &mut a.labels)
            .always_emit();
        decl.object_collection("children", "children", |a| &a.children, |a| &mut a.children)
            .always_emit();
    }
}

#[test]
fn test_always_emit_rejected_where_null_is_a_value() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let err = registry.register_or_get::<AlwaysObject>().unwrap_err();
    assert!(matches!(err, SchemaError::InvalidAlwaysEmit { ref field, .. } if field == "parent"));
    let err = repr.to_json_value(&AlwaysObject::default()).unwrap_err();
    assert!(matches!(
        err,
        ReprError::SchemaDefinition(SchemaError::InvalidAlwaysEmit { .. })
    ));

    let err = repr
        .from_json_value::<AlwaysRaw>(&json!({"payload": null}))
        .unwrap_err();
    assert!(matches!(
        err,
        ReprError::SchemaDefinition(SchemaError::InvalidAlwaysEmit { ref field, .. }) if field == "payload"
    ));
}

#[test]
fn test_always_emit_containers_round_trip() {
    let registry = Registry::new();
    let repr = representation(&registry);

    let unset = AlwaysContainers::default();
    let json = repr.to_json_value(&unset).unwrap();
    assert_eq!(json, json!({"details": null, "labels": null, "children": null}));
    assert_eq!(repr.from_json_value::<AlwaysContainers>(&json).unwrap(), unset);

    let set = AlwaysContainers {
        details: Some(vec![Value::Null]),
        labels: Some(BTreeMap::new()),
        children: Some(Vec::new()),
    };
    let bytes = repr.to_wire(&set).unwrap();
    assert_eq!(repr.from_wire::<AlwaysContainers>(&bytes).unwrap(), set);
}
