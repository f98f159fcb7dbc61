//! Scalar codecs and their coercions.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::{Number, Value as JsonValue};

use super::context::{DecodeContext, EncodeContext};
use super::ElementCodec;
use crate::error::ReprError;
use crate::types::{Coercion, ElementKind, FieldMapping, ScalarType};
use crate::value::Value;

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

impl ElementCodec for bool {
    fn element_kind() -> ElementKind {
        ElementKind::Scalar(ScalarType::Bool)
    }

    fn encode(&self, _field: &FieldMapping, _cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError> {
        Ok(JsonValue::Bool(*self))
    }

    fn decode(json: &JsonValue, field: &FieldMapping, cx: &DecodeContext<'_>) -> Result<Self, ReprError> {
        json.as_bool()
            .ok_or_else(|| cx.type_error(field, ScalarType::Bool.as_str(), json))
    }
}

macro_rules! impl_integer_codec {
    ($ty:ty, $scalar:expr) => {
        impl ElementCodec for $ty {
            fn element_kind() -> ElementKind {
                ElementKind::Scalar($scalar)
            }

            fn encode(&self, field: &FieldMapping, _cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError> {
                Ok(match field.coercion {
                    Coercion::NumericString => JsonValue::String(self.to_string()),
                    _ => JsonValue::from(*self),
                })
            }

            fn decode(json: &JsonValue, field: &FieldMapping, cx: &DecodeContext<'_>) -> Result<Self, ReprError> {
                decode_integer(json, field, cx, $scalar)
            }
        }
    };
}

impl_integer_codec!(i32, ScalarType::Int32);
impl_integer_codec!(u32, ScalarType::UInt32);
impl_integer_codec!(i64, ScalarType::Int64);
impl_integer_codec!(u64, ScalarType::UInt64);

/// Decodes an integer, checking the target range.
///
/// Numeric-string fields take a decimal string, and a bare JSON number as
/// well when `accept_bare_numbers` is set.
fn decode_integer<I: TryFrom<i128>>(
    json: &JsonValue,
    field: &FieldMapping,
    cx: &DecodeContext<'_>,
    scalar: ScalarType,
) -> Result<I, ReprError> {
    let numeric_string = field.coercion == Coercion::NumericString;
    let wide = match json {
        JsonValue::String(text) if numeric_string => text.parse::<i128>().ok(),
        JsonValue::Number(number) if !numeric_string || cx.config().accept_bare_numbers => {
            number_as_i128(number)
        }
        _ => None,
    };

    wide.and_then(|wide| I::try_from(wide).ok()).ok_or_else(|| {
        let expected = if numeric_string {
            format!("{} (decimal string)", scalar.as_str())
        } else {
            scalar.as_str().to_string()
        };
        cx.type_error(field, expected, json)
    })
}

fn number_as_i128(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

macro_rules! impl_float_codec {
    ($ty:ty, $scalar:expr) => {
        impl ElementCodec for $ty {
            fn element_kind() -> ElementKind {
                ElementKind::Scalar($scalar)
            }

            fn encode(&self, _field: &FieldMapping, _cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError> {
                Ok(encode_float(f64::from(*self)))
            }

            fn decode(json: &JsonValue, field: &FieldMapping, cx: &DecodeContext<'_>) -> Result<Self, ReprError> {
                decode_float(json)
                    .and_then(|value| {
                        let narrowed = value as $ty;
                        // A finite number past the target's range must not become infinite.
                        (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
                    })
                    .ok_or_else(|| cx.type_error(field, $scalar.as_str(), json))
            }
        }
    };
}

impl_float_codec!(f32, ScalarType::Float);
impl_float_codec!(f64, ScalarType::Double);

/// Finite values become numbers; NaN and the infinities become their
/// conventional string spellings.
fn encode_float(value: f64) -> JsonValue {
    match Number::from_f64(value) {
        Some(number) => JsonValue::Number(number),
        None if value.is_nan() => JsonValue::String(NAN.to_string()),
        None if value.is_sign_positive() => JsonValue::String(INFINITY.to_string()),
        None => JsonValue::String(NEG_INFINITY.to_string()),
    }
}

fn decode_float(json: &JsonValue) -> Option<f64> {
    match json {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => match text.as_str() {
            NAN => Some(f64::NAN),
            INFINITY => Some(f64::INFINITY),
            NEG_INFINITY => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

impl ElementCodec for String {
    fn element_kind() -> ElementKind {
        ElementKind::Scalar(ScalarType::String)
    }

    fn encode(&self, _field: &FieldMapping, _cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError> {
        Ok(JsonValue::String(self.clone()))
    }

    fn decode(json: &JsonValue, field: &FieldMapping, cx: &DecodeContext<'_>) -> Result<Self, ReprError> {
        json.as_str()
            .map(str::to_string)
            .ok_or_else(|| cx.type_error(field, ScalarType::String.as_str(), json))
    }
}

impl ElementCodec for Vec<u8> {
    fn element_kind() -> ElementKind {
        ElementKind::Scalar(ScalarType::Bytes)
    }

    fn encode(&self, _field: &FieldMapping, _cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError> {
        Ok(JsonValue::String(STANDARD.encode(self)))
    }

    fn decode(json: &JsonValue, field: &FieldMapping, cx: &DecodeContext<'_>) -> Result<Self, ReprError> {
        json.as_str()
            .and_then(decode_base64)
            .ok_or_else(|| cx.type_error(field, "bytes (base64 string)", json))
    }
}

/// Decodes base64 in any of the standard or URL-safe alphabets, padded or not.
pub(crate) fn decode_base64(text: &str) -> Option<Vec<u8>> {
    [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(text).ok())
}

impl ElementCodec for Value {
    const ACCEPTS_NULL: bool = true;

    fn element_kind() -> ElementKind {
        ElementKind::Raw
    }

    fn encode(&self, _field: &FieldMapping, _cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError> {
        Ok(JsonValue::from(self.clone()))
    }

    fn decode(json: &JsonValue, _field: &FieldMapping, _cx: &DecodeContext<'_>) -> Result<Self, ReprError> {
        Ok(Value::from(json.clone()))
    }
}
