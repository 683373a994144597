//! Dynamic schema inference and validation for model replies.
//!
//! The upstream prompt describes three possible document layouts, and the model is free to
//! deviate from all of them - no response schema is enforced on the provider side. A fixed
//! server-side schema would therefore reject legitimate variation. Instead, each reply gets an
//! ephemeral schema inferred from its own top-level keys: every observed key becomes an
//! optional field typed by a coarse classification of its runtime value, and the same object
//! is re-validated against that schema.
//!
//! Validation is all-or-nothing. On success the output contains exactly the fields present in
//! the input; on failure the inference result is discarded and the raw decoded object is
//! returned verbatim, so the endpoint never hard-fails merely because the shape was
//! unexpected.
//!
//! Inference is shallow: only top-level keys are classified. A nested object lands in the
//! [`FieldKind::Fallback`] bucket and its value is passed through as-is - it is *not*
//! stringified and its inner shape is never validated.

use crate::errors::Error;
use serde_json::{Map, Value};
use thiserror::Error as ThisError;

/// Coarse runtime classification of a top-level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    List,
    /// Anything else, including nested objects and nulls. Admits any value, pass-through.
    Fallback,
}

impl FieldKind {
    /// Classify a value's runtime type.
    fn classify(value: &Value) -> Self {
        match value {
            Value::String(_) => FieldKind::Text,
            Value::Number(n) if n.is_i64() || n.is_u64() => FieldKind::Integer,
            Value::Number(_) => FieldKind::Float,
            Value::Bool(_) => FieldKind::Boolean,
            Value::Array(_) => FieldKind::List,
            _ => FieldKind::Fallback,
        }
    }

    /// Whether a value satisfies this classification.
    ///
    /// `Float` also admits integers (the usual numeric widening); `Fallback` admits anything.
    fn admits(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => matches!(value, Value::Number(n) if n.is_i64() || n.is_u64()),
            FieldKind::Float => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::List => value.is_array(),
            FieldKind::Fallback => true,
        }
    }
}

/// Raised when a present field does not satisfy its inferred classification.
#[derive(Debug, ThisError)]
#[error("field `{field}` does not satisfy inferred kind {expected:?} (found {found})")]
pub struct SchemaViolation {
    pub field: String,
    pub expected: FieldKind,
    pub found: &'static str,
}

/// An ephemeral record shape inferred from one decoded reply.
///
/// One entry per observed top-level key, all optional with default "unset". Built fresh for
/// every request; never cached or unified across requests.
#[derive(Debug)]
pub struct InferredSchema {
    fields: Vec<(String, FieldKind)>,
}

impl InferredSchema {
    /// Build a schema from the top-level keys of a decoded object.
    pub fn infer(object: &Map<String, Value>) -> Self {
        let fields = object.iter().map(|(key, value)| (key.clone(), FieldKind::classify(value))).collect();
        Self { fields }
    }

    /// The inferred kind for a key, if the key was observed.
    pub fn kind_of(&self, key: &str) -> Option<FieldKind> {
        self.fields.iter().find(|(name, _)| name == key).map(|(_, kind)| *kind)
    }

    /// Validate an object against this schema.
    ///
    /// Fields left unset are omitted from the output; present fields must satisfy their
    /// classification. All-or-nothing: the first violation aborts, there is no field-level
    /// salvage.
    pub fn validate(&self, object: &Map<String, Value>) -> Result<Map<String, Value>, SchemaViolation> {
        let mut shaped = Map::new();
        for (name, kind) in &self.fields {
            match object.get(name) {
                Some(value) if kind.admits(value) => {
                    shaped.insert(name.clone(), value.clone());
                }
                Some(value) => {
                    return Err(SchemaViolation {
                        field: name.clone(),
                        expected: *kind,
                        found: json_type_name(value),
                    });
                }
                None => {}
            }
        }
        Ok(shaped)
    }
}

/// Decode a raw model reply and shape it through an inferred schema.
///
/// An undecodable reply is terminal ([`Error::UpstreamDecode`], carrying the raw text). A
/// decodable reply always produces a result: if validation fails, the raw decoded object is
/// returned unmodified.
pub fn shape_reply(raw: &str) -> Result<Value, Error> {
    let decoded: Value = serde_json::from_str(raw).map_err(|source| Error::UpstreamDecode {
        raw: raw.to_owned(),
        source,
    })?;

    let Some(object) = decoded.as_object() else {
        // The reply parsed but is not an object, so there are no keys to infer from.
        return Err(anyhow::anyhow!("model reply decoded to {}, expected a JSON object", json_type_name(&decoded)).into());
    };

    let schema = InferredSchema::infer(object);
    match schema.validate(object) {
        Ok(shaped) => {
            tracing::debug!(fields = shaped.len(), "Model reply validated against inferred schema");
            Ok(Value::Object(shaped))
        }
        Err(violation) => {
            tracing::warn!(%violation, "Dynamic schema validation failed, returning raw analysis");
            Ok(decoded)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().expect("test value must be an object").clone()
    }

    #[test]
    fn test_classification_of_primitive_fields() {
        let reply = object(json!({
            "tipo_documento": "RG",
            "numero_documento": "123",
            "confianca": 0.9,
            "ativo": true,
            "tags": ["a", "b"]
        }));

        let schema = InferredSchema::infer(&reply);
        assert_eq!(schema.kind_of("tipo_documento"), Some(FieldKind::Text));
        assert_eq!(schema.kind_of("numero_documento"), Some(FieldKind::Text));
        assert_eq!(schema.kind_of("confianca"), Some(FieldKind::Float));
        assert_eq!(schema.kind_of("ativo"), Some(FieldKind::Boolean));
        assert_eq!(schema.kind_of("tags"), Some(FieldKind::List));
        assert_eq!(schema.kind_of("inexistente"), None);
    }

    #[test]
    fn test_infer_validate_is_idempotent_for_primitives() {
        // infer -> validate -> output reproduces the input when all fields are present and
        // well-typed, with an identical key set
        let reply = object(json!({
            "tipo_documento": "RG",
            "numero_documento": "123",
            "confianca": 0.9,
            "ativo": true,
            "tags": ["a", "b"],
            "quantidade": 3
        }));

        let schema = InferredSchema::infer(&reply);
        let shaped = schema.validate(&reply).expect("well-typed object must validate");
        assert_eq!(shaped, reply);
    }

    #[test]
    fn test_nested_object_is_passed_through_not_recursed() {
        // Shallow-only: the nested object's inner shape is never typed or coerced, the value
        // is accepted by the fallback classification and carried as-is
        let reply = object(json!({"titular": {"nome": "Ana"}}));

        let schema = InferredSchema::infer(&reply);
        assert_eq!(schema.kind_of("titular"), Some(FieldKind::Fallback));

        let shaped = schema.validate(&reply).expect("nested object must not raise");
        assert_eq!(shaped["titular"], json!({"nome": "Ana"}));
    }

    #[test]
    fn test_null_value_falls_back_without_error() {
        let reply = object(json!({"data_validade": null}));

        let schema = InferredSchema::infer(&reply);
        assert_eq!(schema.kind_of("data_validade"), Some(FieldKind::Fallback));

        let shaped = schema.validate(&reply).expect("null must not raise");
        assert_eq!(shaped["data_validade"], Value::Null);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let full = object(json!({"a": 1, "b": "x"}));
        let partial = object(json!({"a": 1}));

        let schema = InferredSchema::infer(&full);
        let shaped = schema.validate(&partial).expect("subset must validate");
        assert_eq!(shaped, object(json!({"a": 1})));
    }

    #[test]
    fn test_mismatched_value_is_a_violation() {
        let seen = object(json!({"numero": 42}));
        let other = object(json!({"numero": ["4", "2"]}));

        let schema = InferredSchema::infer(&seen);
        let violation = schema.validate(&other).expect_err("array where integer inferred");
        assert_eq!(violation.field, "numero");
        assert_eq!(violation.expected, FieldKind::Integer);
        assert_eq!(violation.found, "array");
    }

    #[test]
    fn test_float_admits_integer() {
        let seen = object(json!({"confianca": 0.9}));
        let other = object(json!({"confianca": 1}));

        let schema = InferredSchema::infer(&seen);
        assert!(schema.validate(&other).is_ok());
    }

    #[test]
    fn test_shape_reply_round_trip() {
        let raw = r#"{"tipo_documento": "RG", "numero_documento": "123", "confianca": 0.9, "ativo": true, "tags": ["a", "b"]}"#;
        let shaped = shape_reply(raw).expect("valid reply must shape");
        assert_eq!(shaped, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn test_shape_reply_undecodable_is_terminal() {
        let err = shape_reply("I could not read the document, sorry!").expect_err("non-JSON must fail");
        match err {
            Error::UpstreamDecode { raw, .. } => {
                assert_eq!(raw, "I could not read the document, sorry!");
            }
            other => panic!("expected UpstreamDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_shape_reply_non_object_hits_generic_error() {
        let err = shape_reply("[1, 2, 3]").expect_err("array reply has no keys to infer from");
        assert!(matches!(err, Error::Other(_)));
    }
}
