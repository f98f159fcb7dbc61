//! Conversion of individual field values to and from JSON.

mod context;
mod nested;
mod scalar;

pub use context::{DecodeContext, EncodeContext};
pub use nested::Nested;

pub(crate) use context::json_kind;

use serde_json::Value as JsonValue;

use crate::error::ReprError;
use crate::types::{ElementKind, FieldMapping};

/// A value that can be held by a scalar, raw, list or map field.
///
/// Implemented for `bool`, the 32/64-bit integers, `f32`, `f64`, `String`,
/// `Vec<u8>` (bytes) and [`Value`](crate::Value) (raw JSON).
pub trait ElementCodec: Sized + 'static {
    /// Whether JSON `null` is a value of this type rather than "absent".
    const ACCEPTS_NULL: bool = false;

    fn element_kind() -> ElementKind;

    /// Encodes one value, honoring the field's coercion.
    fn encode(&self, field: &FieldMapping, cx: &EncodeContext<'_>) -> Result<JsonValue, ReprError>;

    /// Decodes one value, honoring the field's coercion.
    fn decode(json: &JsonValue, field: &FieldMapping, cx: &DecodeContext<'_>) -> Result<Self, ReprError>;
}
