/// Error type for schema declaration and registration.
///
/// Raised when a DTO's declared field list is malformed. These are fatal for
/// the type: registration is retried (and fails again) on every access until
/// the declaration is fixed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Type '{type_name}' declares wire key '{wire_key}' more than once")]
    DuplicateWireKey { type_name: String, wire_key: String },

    #[error("Type '{type_name}' declares field '{field}' more than once")]
    DuplicateFieldName { type_name: String, field: String },

    #[error("Type '{type_name}' field '{field}' has an empty wire key")]
    EmptyWireKey { type_name: String, field: String },

    #[error("Type '{type_name}' field '{field}': {message}")]
    InconsistentNesting {
        type_name: String,
        field: String,
        message: String,
    },

    #[error("Type '{type_name}' field '{field}': coercion {coercion} is not valid for {kind}")]
    InvalidCoercion {
        type_name: String,
        field: String,
        coercion: String,
        kind: String,
    },

    #[error("Type '{type_name}' field '{field}': always_emit is not valid for {kind}, where null is a value")]
    InvalidAlwaysEmit {
        type_name: String,
        field: String,
        kind: String,
    },

    #[error("Type '{type_name}' field '{field}' uses reserved wire key '{wire_key}' without an alias")]
    ReservedKey {
        type_name: String,
        field: String,
        wire_key: String,
    },

    #[error("Type '{type_name}' aliases wire key '{wire_key}' which no field declares")]
    DanglingAlias { type_name: String, wire_key: String },

    #[error("Type '{type_name}' alias '{alias}' collides with another wire key")]
    AliasCollision { type_name: String, alias: String },

    #[error("Type name '{type_name}' is already registered by a different type")]
    DuplicateTypeName { type_name: String },

    #[error("Type '{type_name}' field '{field}' references '{referenced}' which failed to register: {source}")]
    UnresolvedType {
        type_name: String,
        field: String,
        referenced: String,
        #[source]
        source: Box<SchemaError>,
    },

    #[error("Registry entry for '{type_name}' does not match its type")]
    RegistryMismatch { type_name: String },
}
