use thiserror::Error;

use crate::type_name::TypeName;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";

/// Result type for the `graph_snapshot` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Error categories raised while reading a live object graph or encoding a snapshot
///
/// Everything except [`Error::Encoding`] is contained by the walker and surfaces as an
/// error marker plus a diagnostic instead of failing the call.
#[derive(Error)]
pub enum Error {
    /// A field getter on a live object failed
    #[error("Field access failed: {0}")]
    FieldAccess(String),

    /// A field index outside the type's descriptor table was requested
    #[error("Field index {index} out of range for {type_name}")]
    FieldIndex {
        /// The type whose table was consulted
        type_name: TypeName,
        /// The requested index
        index:     usize,
    },

    /// A field name that the type does not declare
    #[error("Unknown field `{field}` on {type_name}")]
    UnknownField {
        /// The type that was written to
        type_name: TypeName,
        /// The missing field name
        field:     String,
    },

    /// Interior lock of a live object was poisoned by a panicking writer
    #[error("Lock poisoned while reading {0}")]
    PoisonedLock(TypeName),

    /// A type handler could not convert an instance
    #[error("Handler `{handler}` failed: {message}")]
    Handler {
        /// Name of the failing handler
        handler: String,
        /// What went wrong
        message: String,
    },

    /// Depth configuration could not be parsed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Intermediate tree could not be rendered to JSON text
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Tracing subscriber setup failed
    #[error("Tracing setup failed: {0}")]
    Tracing(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldAccess(s) => f.debug_tuple("FieldAccess").field(s).finish(),
            Self::FieldIndex { type_name, index } => f
                .debug_struct("FieldIndex")
                .field("type_name", type_name)
                .field("index", index)
                .finish(),
            Self::UnknownField { type_name, field } => f
                .debug_struct("UnknownField")
                .field("type_name", type_name)
                .field("field", field)
                .finish(),
            Self::PoisonedLock(t) => f.debug_tuple("PoisonedLock").field(t).finish(),
            Self::Handler { handler, message } => f
                .debug_struct("Handler")
                .field("handler", handler)
                .field("message", message)
                .finish(),
            Self::Configuration(s) => f.debug_tuple("Configuration").field(s).finish(),
            Self::Encoding(s) => f.debug_tuple("Encoding").field(s).finish(),
            Self::Tracing(s) => f.debug_tuple("Tracing").field(s).finish(),
        }
    }
}

impl Error {
    /// Create a "Failed to X" field access error
    pub fn failed_to(action: &str, details: impl std::fmt::Display) -> Self {
        Self::FieldAccess(format!("{MSG_FAILED_TO_PREFIX} {action}: {details}"))
    }

    /// Create an "Invalid X" configuration error
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create error for an out-of-range field index
    pub fn field_index(type_name: &TypeName, index: usize) -> Self {
        Self::FieldIndex {
            type_name: type_name.clone(),
            index,
        }
    }

    /// Create error for a write to an undeclared field
    pub fn unknown_field(type_name: &TypeName, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.clone(),
            field:     field.into(),
        }
    }

    /// Create error for a handler that could not convert its instance
    pub fn handler_failed(handler: &str, message: impl std::fmt::Display) -> Self {
        Self::Handler {
            handler: handler.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_messages() {
        assert_eq!(
            Error::failed_to("read transform", "detached").to_string(),
            "Field access failed: Failed to read transform: detached"
        );
        assert_eq!(
            Error::invalid("depth level", "'huge'").to_string(),
            "Configuration error: Invalid depth level: 'huge'"
        );
        assert_eq!(
            Error::field_index(&TypeName::from("Player"), 7).to_string(),
            "Field index 7 out of range for Player"
        );
    }
}
