use serde_json::{Map, Value as JsonValue};

use crate::codec::DecodeContext;
use crate::error::ReprError;
use crate::types::type_registry::Registered;
use crate::types::Representable;

/// Decodes a JSON object into a fresh `T`.
///
/// Keys are matched against effective wire keys, then against the declared
/// keys of aliased fields. A key absent from the
/// object leaves its field unset; a key with no matching field goes through
/// the configured unknown-field policy.
pub(crate) fn decode_instance<T: Representable>(
    entry: &Registered<T>,
    object: &Map<String, JsonValue>,
    cx: &DecodeContext<'_>,
) -> Result<T, ReprError> {
    let descriptor = &entry.descriptor;
    let mut instance = T::default();

    for (key, json) in object {
        let Some(index) = descriptor.resolve_index(key) else {
            cx.unknown_field(key)?;
            continue;
        };
        let (field, binding) = (&descriptor.fields()[index], &entry.bindings[index]);
        (binding.decode)(&mut instance, json, field, cx)?;
    }

    Ok(instance)
}
