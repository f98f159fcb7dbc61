use serde_json::{Map, Value as JsonValue};

use crate::codec::EncodeContext;
use crate::error::ReprError;
use crate::types::type_registry::Registered;
use crate::types::Representable;

/// Encodes `instance` into a JSON object with keys in declaration order.
///
/// Unset fields are omitted unless declared `always_emit`, in which case
/// they are written as `null`.
pub(crate) fn encode_instance<T: Representable>(
    entry: &Registered<T>,
    instance: &T,
    cx: &EncodeContext<'_>,
) -> Result<Map<String, JsonValue>, ReprError> {
    let descriptor = &entry.descriptor;
    let mut object = Map::with_capacity(descriptor.len());

    for (field, binding) in descriptor.fields().iter().zip(&entry.bindings) {
        if let Some(value) = (binding.encode)(instance, field, cx)? {
            object.insert(field.wire_key.clone(), value);
        }
    }

    Ok(object)
}
