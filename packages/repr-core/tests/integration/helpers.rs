//! Shared DTOs for integration tests, shaped like a generated ML platform client.

use std::collections::BTreeMap;

use repr_core::types::TYPE_KEY;
use repr_core::{Declaration, Nested, Registry, ReprConfig, Representable, Representation, Value};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Model {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub size_bytes: Option<i64>,
    pub etag: Option<Vec<u8>>,
    pub labels: Option<BTreeMap<String, String>>,
    pub deployed: Option<bool>,
    pub base_model: Option<Nested<Model>>,
    pub versions: Option<Vec<ModelVersion>>,
    pub endpoints: Option<BTreeMap<String, Endpoint>>,
    pub metadata: Option<Value>,
    pub type_url: Option<String>,
}

impl Representable for Model {
    const TYPE_NAME: &'static str = "Model";

    fn declare(decl: &mut Declaration<Self>) {
        decl.property("name", "name", |m| &m.name, |m| &mut m.name);
        decl.property("display_name", "displayName", |m| &m.display_name, |m| &mut m.display_name);
        decl.property("size_bytes", "sizeBytes", |m| &m.size_bytes, |m| &mut m.size_bytes)
            .numeric_string();
        decl.property("etag", "etag", |m| &m.etag, |m| &mut m.etag).base64();
        decl.hash("labels", "labels", |m| &m.labels, |m| &mut m.labels);
        decl.property("deployed", "deployed", |m| &m.deployed, |m| &mut m.deployed)
            .always_emit();
        decl.object("base_model", "baseModel", |m| &m.base_model, |m| &mut m.base_model);
        decl.object_collection("versions", "versions", |m| &m.versions, |m| &mut m.versions);
        decl.object_hash("endpoints", "endpoints", |m| &m.endpoints, |m| &mut m.endpoints);
        decl.property("metadata", "metadata", |m| &m.metadata, |m| &mut m.metadata);
        decl.property("type_url", TYPE_KEY, |m| &m.type_url, |m| &mut m.type_url);
        decl.alias(TYPE_KEY, "_@type");
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ModelVersion {
    pub version_id: Option<String>,
    pub create_time: Option<String>,
    pub scores: Option<Vec<f64>>,
    pub sample_count: Option<Vec<u64>>,
}

impl Representable for ModelVersion {
    const TYPE_NAME: &'static str = "ModelVersion";

    fn declare(decl: &mut Declaration<Self>) {
        decl.property("version_id", "versionId", |v| &v.version_id, |v| &mut v.version_id);
        decl.property("create_time", "createTime", |v| &v.create_time, |v| &mut v.create_time);
        decl.collection("scores", "scores", |v| &v.scores, |v| &mut v.scores);
        decl.collection("sample_count", "sampleCount", |v| &v.sample_count, |v| &mut v.sample_count)
            .numeric_string();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Endpoint {
    pub uri: Option<String>,
    pub port: Option<u32>,
    pub method: Option<String>,
    pub traffic_split: Option<BTreeMap<String, i32>>,
}

impl Representable for Endpoint {
    const TYPE_NAME: &'static str = "Endpoint";

    fn declare(decl: &mut Declaration<Self>) {
        decl.property("uri", "uri", |e| &e.uri, |e| &mut e.uri);
        decl.property("port", "port", |e| &e.port, |e| &mut e.port);
        decl.property("method", "method", |e| &e.method, |e| &mut e.method);
        decl.hash("traffic_split", "trafficSplit", |e| &e.traffic_split, |e| &mut e.traffic_split);
    }
}

/// Long-running operation wrapper with an always-emitted `done` flag.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Operation {
    pub name: Option<String>,
    pub done: Option<bool>,
    pub error: Option<Nested<Status>>,
    pub response: Option<Value>,
}

impl Representable for Operation {
    const TYPE_NAME: &'static str = "Operation";

    fn declare(decl: &mut Declaration<Self>) {
        decl.property("name", "name", |o| &o.name, |o| &mut o.name);
        decl.property("done", "done", |o| &o.done, |o| &mut o.done).always_emit();
        decl.object("error", "error", |o| &o.error, |o| &mut o.error);
        decl.property("response", "response", |o| &o.response, |o| &mut o.response);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Status {
    pub code: Option<i32>,
    pub message: Option<String>,
    pub details: Option<Vec<Value>>,
}

impl Representable for Status {
    const TYPE_NAME: &'static str = "Status";

    fn declare(decl: &mut Declaration<Self>) {
        decl.property("code", "code", |s| &s.code, |s| &mut s.code);
        decl.property("message", "message", |s| &s.message, |s| &mut s.message);
        decl.collection("details", "details", |s| &s.details, |s| &mut s.details);
    }
}

/// A fully populated model exercising every field kind.
pub fn sample_model() -> Model {
    Model {
        name: Some("projects/p/models/m1".to_string()),
        display_name: Some("Sentiment".to_string()),
        size_bytes: Some(i64::MAX),
        etag: Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        labels: Some(BTreeMap::from([
            ("env".to_string(), "prod".to_string()),
            ("team".to_string(), "nlp".to_string()),
        ])),
        deployed: Some(false),
        base_model: Some(Nested::new(Model {
            name: Some("projects/p/models/base".to_string()),
            base_model: Some(Nested::Null),
            ..Model::default()
        })),
        versions: Some(vec![ModelVersion {
            version_id: Some("3".to_string()),
            create_time: Some("2026-01-02T03:04:05Z".to_string()),
            scores: Some(vec![0.5, 0.875]),
            sample_count: Some(vec![u64::MAX, 0]),
        }]),
        endpoints: Some(BTreeMap::from([(
            "primary".to_string(),
            Endpoint {
                uri: Some("https://example.invalid/predict".to_string()),
                port: Some(443),
                method: Some("POST".to_string()),
                traffic_split: Some(BTreeMap::from([("v3".to_string(), 100)])),
            },
        )])),
        metadata: Some(Value::from(serde_json::json!({"framework": "onnx", "layers": [1, 2]}))),
        type_url: Some("type.googleapis.com/Model".to_string()),
    }
}

/// Representation over a fresh, isolated registry.
pub fn representation(registry: &Registry) -> Representation<'_> {
    Representation::with_registry(registry, ReprConfig::default())
}
