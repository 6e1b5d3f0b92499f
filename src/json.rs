//! Conversion between JSON values and runtime [`Value`]s.
//!
//! This is the seam a deserializer uses to feed synthesized properties: it converts a single JSON value
//! into the runtime value of a declared [`TypeRef`] and back. Document parsing, paths and position
//! tracking belong to the caller.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value as Json;
use thiserror::Error;
use typeforge_core::{BuiltinType, TypeRef};

use crate::value::Value;

/// Accepted `date-time` layout besides RFC 3339.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonBridgeError {
    #[error("expected `{expected}`, found JSON {found}")]
    Mismatch { expected: TypeRef, found: &'static str },

    #[error("{value} is out of range for `{expected}`")]
    OutOfRange { expected: TypeRef, value: String },

    #[error("`{0}` is not a valid date-time")]
    InvalidDateTime(String),

    #[error("values of `{0}` cannot be built from JSON")]
    Unsupported(TypeRef),
}

/// Convert `json` into a value conforming to `ty`.
pub fn value_from_json(json: &Json, ty: &TypeRef) -> Result<Value, JsonBridgeError> {
    if json.is_null() {
        return if ty.admits_null() {
            Ok(Value::Null)
        } else {
            Err(mismatch(ty, json))
        };
    }

    match ty {
        TypeRef::Builtin(id) => builtin_from_json(json, *id, ty),
        TypeRef::Nullable(inner) => value_from_json(json, inner),
        TypeRef::Array(elem) => match json {
            Json::Array(items) => items
                .iter()
                .map(|item| value_from_json(item, elem))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::array),
            _ => Err(mismatch(ty, json)),
        },
        TypeRef::Class(_) | TypeRef::GenericParam(_) | TypeRef::ByRef(_) | TypeRef::Void => {
            Err(JsonBridgeError::Unsupported(ty.clone()))
        }
    }
}

fn builtin_from_json(json: &Json, id: BuiltinType, ty: &TypeRef) -> Result<Value, JsonBridgeError> {
    match id {
        BuiltinType::Bool => json.as_bool().map(Value::Bool).ok_or_else(|| mismatch(ty, json)),
        BuiltinType::Char => {
            let s = json.as_str().ok_or_else(|| mismatch(ty, json))?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(JsonBridgeError::OutOfRange {
                    expected: ty.clone(),
                    value: format!("{:?}", s),
                }),
            }
        }
        BuiltinType::Int8 => integer::<i8>(json, ty).map(Value::I8),
        BuiltinType::Int16 => integer::<i16>(json, ty).map(Value::I16),
        BuiltinType::Int32 => integer::<i32>(json, ty).map(Value::I32),
        BuiltinType::Int64 => integer::<i64>(json, ty).map(Value::I64),
        BuiltinType::UInt8 => integer::<u8>(json, ty).map(Value::U8),
        BuiltinType::UInt16 => integer::<u16>(json, ty).map(Value::U16),
        BuiltinType::UInt32 => integer::<u32>(json, ty).map(Value::U32),
        BuiltinType::UInt64 => integer::<u64>(json, ty).map(Value::U64),
        BuiltinType::Float32 => {
            let v = json.as_f64().ok_or_else(|| mismatch(ty, json))?;
            if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                return Err(JsonBridgeError::OutOfRange {
                    expected: ty.clone(),
                    value: v.to_string(),
                });
            }
            Ok(Value::F32(v as f32))
        }
        BuiltinType::Float64 => json.as_f64().map(Value::F64).ok_or_else(|| mismatch(ty, json)),
        BuiltinType::String => json.as_str().map(Value::str).ok_or_else(|| mismatch(ty, json)),
        BuiltinType::DateTime => {
            let s = json.as_str().ok_or_else(|| mismatch(ty, json))?;
            parse_date_time(s).map(Value::DateTime)
        }
        BuiltinType::Object => infer(json),
    }
}

/// Integer conversion with range checking; fractional numbers are a mismatch.
fn integer<T>(json: &Json, ty: &TypeRef) -> Result<T, JsonBridgeError>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let Json::Number(n) = json else {
        return Err(mismatch(ty, json));
    };
    let converted = if let Some(i) = n.as_i64() {
        <T as TryFrom<i64>>::try_from(i).ok()
    } else if let Some(u) = n.as_u64() {
        <T as TryFrom<u64>>::try_from(u).ok()
    } else {
        return Err(mismatch(ty, json));
    };
    converted.ok_or_else(|| JsonBridgeError::OutOfRange {
        expected: ty.clone(),
        value: n.to_string(),
    })
}

fn parse_date_time(s: &str) -> Result<NaiveDateTime, JsonBridgeError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT))
        .map_err(|_| JsonBridgeError::InvalidDateTime(s.to_string()))
}

/// Values stored in an `object` slot keep the most natural runtime tag of their JSON form.
fn infer(json: &Json) -> Result<Value, JsonBridgeError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(n
            .as_i64()
            .map(Value::I64)
            .or_else(|| n.as_u64().map(Value::U64))
            .unwrap_or_else(|| Value::F64(n.as_f64().unwrap_or(f64::NAN)))),
        Json::String(s) => Ok(Value::str(s)),
        Json::Array(items) => items.iter().map(infer).collect::<Result<Vec<_>, _>>().map(Value::array),
        Json::Object(_) => Err(mismatch(&TypeRef::OBJECT, json)),
    }
}

/// Convert a runtime value to JSON.
///
/// Objects become JSON objects keyed by property name, read through their getters. An object reachable
/// from itself is cut off with `null` at the point it repeats.
pub fn value_to_json(value: &Value) -> Json {
    to_json(value, &mut Vec::new())
}

fn to_json(value: &Value, path: &mut Vec<usize>) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::Char(v) => Json::String(v.to_string()),
        Value::I8(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::U8(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::DateTime(v) => Json::String(v.format(DATE_TIME_FORMAT).to_string()),
        Value::Str(v) => Json::String(v.to_string()),
        Value::Array(items) => Json::Array(items.iter().map(|item| to_json(item, path)).collect()),
        Value::Object(obj) => {
            let addr = obj.addr();
            if path.contains(&addr) {
                return Json::Null;
            }
            path.push(addr);
            let map = obj
                .type_def()
                .properties()
                .iter()
                .filter(|p| p.can_read())
                .map(|p| {
                    let json = obj.get(p.name()).map_or(Json::Null, |v| to_json(&v, path));
                    (p.name().to_string(), json)
                })
                .collect();
            path.pop();
            Json::Object(map)
        }
    }
}

/// Non-finite floats have no JSON form.
fn float(v: f64) -> Json {
    serde_json::Number::from_f64(v).map_or(Json::Null, Json::Number)
}

fn mismatch(expected: &TypeRef, json: &Json) -> JsonBridgeError {
    JsonBridgeError::Mismatch {
        expected: expected.clone(),
        found: json_kind(json),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::Host;
    use crate::config::HostLimits;
    use crate::synth::{Synthesizer, TypeRequest};
    use crate::value::zero_instant;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(value_from_json(&json!(true), &TypeRef::BOOL).unwrap(), Value::Bool(true));
        assert_eq!(value_from_json(&json!("x"), &TypeRef::CHAR).unwrap(), Value::Char('x'));
        assert_eq!(value_from_json(&json!(-5), &TypeRef::INT32).unwrap(), Value::I32(-5));
        assert_eq!(value_from_json(&json!(1.5), &TypeRef::FLOAT64).unwrap(), Value::F64(1.5));
        assert_eq!(value_from_json(&json!("abc"), &TypeRef::STRING).unwrap(), Value::str("abc"));
    }

    #[test]
    fn test_integer_ranges() {
        let uint8 = TypeRef::Builtin(BuiltinType::UInt8);
        assert_eq!(value_from_json(&json!(255), &uint8).unwrap(), Value::U8(255));
        assert!(matches!(
            value_from_json(&json!(256), &uint8),
            Err(JsonBridgeError::OutOfRange { .. })
        ));
        assert!(matches!(
            value_from_json(&json!(-1), &uint8),
            Err(JsonBridgeError::OutOfRange { .. })
        ));
        assert!(matches!(
            value_from_json(&json!(u64::MAX), &TypeRef::INT64),
            Err(JsonBridgeError::OutOfRange { .. })
        ));
        assert!(matches!(
            value_from_json(&json!(1.5), &TypeRef::INT32),
            Err(JsonBridgeError::Mismatch { found: "number", .. })
        ));
        let uint64 = TypeRef::Builtin(BuiltinType::UInt64);
        assert_eq!(value_from_json(&json!(u64::MAX), &uint64).unwrap(), Value::U64(u64::MAX));
    }

    #[test]
    fn test_date_times() {
        let parsed = value_from_json(&json!("2024-03-01T12:30:00"), &TypeRef::DATE_TIME).unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01T12:30:00");

        let offset = value_from_json(&json!("2024-03-01T12:30:00+02:00"), &TypeRef::DATE_TIME).unwrap();
        assert_eq!(offset.to_string(), "2024-03-01T10:30:00");

        let zero = value_from_json(&json!("0001-01-01T00:00:00"), &TypeRef::DATE_TIME).unwrap();
        assert_eq!(zero, Value::DateTime(zero_instant()));

        assert!(matches!(
            value_from_json(&json!("yesterday"), &TypeRef::DATE_TIME),
            Err(JsonBridgeError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn test_null_and_arrays() {
        let ty = TypeRef::array(TypeRef::nullable(TypeRef::INT32));
        assert_eq!(
            value_from_json(&json!([1, null, 3]), &ty).unwrap(),
            Value::array([Value::I32(1), Value::Null, Value::I32(3)])
        );
        assert_eq!(value_from_json(&json!(null), &TypeRef::STRING).unwrap(), Value::Null);
        assert!(matches!(
            value_from_json(&json!(null), &TypeRef::INT32),
            Err(JsonBridgeError::Mismatch { found: "null", .. })
        ));
        assert!(matches!(
            value_from_json(&json!("1"), &TypeRef::array(TypeRef::INT32)),
            Err(JsonBridgeError::Mismatch { found: "string", .. })
        ));
    }

    #[test]
    fn test_object_inference() {
        assert_eq!(value_from_json(&json!(3), &TypeRef::OBJECT).unwrap(), Value::I64(3));
        assert_eq!(
            value_from_json(&json!(["a", 1.5]), &TypeRef::OBJECT).unwrap(),
            Value::array([Value::str("a"), Value::F64(1.5)])
        );
        assert!(value_from_json(&json!({"a": 1}), &TypeRef::OBJECT).is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(value_to_json(&Value::Char('q')), json!("q"));
        assert_eq!(value_to_json(&Value::F64(f64::NAN)), json!(null));
        assert_eq!(value_to_json(&Value::DateTime(zero_instant())), json!("0001-01-01T00:00:00"));
        assert_eq!(
            value_to_json(&Value::array([Value::U8(1), Value::Null])),
            json!([1, null])
        );
    }

    #[test]
    fn test_objects_to_json() {
        let host = Host::new(HostLimits::default());
        let synth = Synthesizer::with_host(&host);
        let inner = synth.synthesize(&TypeRequest::new("Name", TypeRef::STRING)).unwrap();
        let outer = synth.synthesize(&TypeRequest::new("Child", inner.type_ref())).unwrap();

        let child = inner.instantiate().unwrap();
        child.set("Name", "leaf").unwrap();
        let parent = outer.instantiate().unwrap();
        parent.set("Child", child).unwrap();

        assert_eq!(
            value_to_json(&Value::Object(parent)),
            json!({"Child": {"Name": "leaf"}})
        );
    }

    #[test]
    fn test_self_reference_is_cut() {
        let host = Host::new(HostLimits::default());
        let handle = Synthesizer::with_host(&host)
            .synthesize(&TypeRequest::new("Next", TypeRef::OBJECT))
            .unwrap();
        let node = handle.instantiate().unwrap();
        node.set("Next", node.clone()).unwrap();
        assert_eq!(value_to_json(&Value::Object(node.clone())), json!({"Next": null}));

        // Break the cycle so the object is freed
        node.set("Next", Value::Null).unwrap();
        assert_eq!(value_to_json(&Value::Object(node)), json!({"Next": null}));
    }

    #[test]
    fn test_class_values_are_unsupported() {
        let host = Host::new(HostLimits::default());
        let handle = Synthesizer::with_host(&host)
            .synthesize(&TypeRequest::new("Bar", TypeRef::INT32))
            .unwrap();
        assert!(matches!(
            value_from_json(&json!({"Bar": 1}), &handle.type_ref()),
            Err(JsonBridgeError::Unsupported(_))
        ));
    }
}
