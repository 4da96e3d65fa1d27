//! Error types for typesieve.
//!
//! All errors are strongly typed using thiserror. Construction-time
//! problems surface as [`ValidationError`] before any resolution work
//! starts; failures from the introspection collaborator or from
//! caller-supplied predicates abort the whole resolution call.

use thiserror::Error;

use crate::descriptor::ModuleId;

/// Validation errors raised while constructing opinions, filters or plans.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// An argument failed a precondition.
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        param: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Allow and deny lists share types.
    #[error("A type can only be either included or excluded, not both: {}", overlapping.join(", "))]
    OverlappingTypeLists {
        /// Full names present in both lists, sorted.
        overlapping: Vec<String>,
    },

    /// A plan names a predicate the registry does not know.
    #[error("Predicate '{name}' is not registered")]
    MissingPredicate {
        /// Requested predicate name.
        name: String,
    },

    /// A name filter pattern does not compile.
    #[error("Invalid name pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A required plan field is empty.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Path of the field.
        field: String,
    },

    /// A plan field is longer than allowed.
    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        /// Path of the field.
        field: String,
        /// Maximum length in bytes.
        max_length: usize,
    },
}

impl ValidationError {
    /// Returns the offending parameter name for argument errors.
    #[must_use]
    pub const fn param(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { param, .. } => Some(*param),
            _ => None,
        }
    }
}

/// Errors reported by an [`Introspector`](crate::introspect::Introspector).
#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// The module is not known to the backend.
    #[error("Module not found: {module}")]
    UnknownModule {
        /// Requested module.
        module: ModuleId,
    },

    /// The marker type is not known to the backend.
    #[error("Type not found: {name}")]
    UnknownType {
        /// Full name of the marker.
        name: String,
    },

    /// Any other backend failure, including poisoned locks.
    #[error("Introspection backend error: {0}")]
    Backend(String),
}

/// Top-level error type for typesieve.
#[derive(Debug, Error)]
pub enum SieveError {
    /// Construction-time validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The introspector failed.
    #[error("Introspection error: {0}")]
    Introspection(#[from] IntrospectionError),

    /// A caller-supplied predicate failed.
    #[error("Predicate failed on {type_name}: {message}")]
    Predicate {
        /// Full name of the type being tested.
        type_name: String,
        /// Failure description.
        message: String,
    },

    /// A plan could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Failure description.
        message: String,
    },

    /// Unexpected internal state.
    #[error("Internal error: {message}")]
    Internal {
        /// Failure description.
        message: String,
    },
}

impl SieveError {
    /// Creates a predicate failure for the given type.
    #[must_use]
    pub fn predicate(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Predicate {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an introspection error.
    #[must_use]
    pub const fn is_introspection(&self) -> bool {
        matches!(self, Self::Introspection(_))
    }

    /// Returns true if a caller-supplied predicate failed.
    #[must_use]
    pub const fn is_predicate(&self) -> bool {
        matches!(self, Self::Predicate { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for typesieve operations.
pub type SieveResult<T> = Result<T, SieveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_param() {
        let err = ValidationError::InvalidArgument {
            param: "interfaceType",
            reason: "Specified type Object is not an interface.".to_string(),
        };
        assert_eq!(err.param(), Some("interfaceType"));
        let msg = format!("{err}");
        assert!(msg.contains("interfaceType"));
        assert!(msg.contains("not an interface"));
    }

    #[test]
    fn test_overlapping_lists_message() {
        let err = ValidationError::OverlappingTypeLists {
            overlapping: vec!["App.Services.Mailer".to_string(), "App.Jobs.Nightly".to_string()],
        };
        let msg = format!("{err}");
        assert!(msg.contains("either included or excluded"));
        assert!(msg.contains("App.Services.Mailer, App.Jobs.Nightly"));
        assert_eq!(err.param(), None);
    }

    #[test]
    fn test_unknown_module() {
        let module = ModuleId::from_name("app.core");
        let err = IntrospectionError::UnknownModule { module };
        assert!(format!("{err}").contains(&module.to_string()));
    }

    #[test]
    fn test_sieve_error_from_validation() {
        let err: SieveError = ValidationError::MissingPredicate {
            name: "is_handler".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_introspection());
        assert!(format!("{err}").contains("is_handler"));
    }

    #[test]
    fn test_sieve_error_from_introspection() {
        let err: SieveError = IntrospectionError::Backend("poisoned lock: modules".to_string()).into();
        assert!(err.is_introspection());
        assert!(format!("{err}").contains("poisoned lock"));
    }

    #[test]
    fn test_sieve_error_helpers() {
        let err = SieveError::predicate("App.Services.Mailer", "metadata unavailable");
        assert!(err.is_predicate());
        let msg = format!("{err}");
        assert!(msg.contains("App.Services.Mailer"));
        assert!(msg.contains("metadata unavailable"));

        assert!(SieveError::config("bad plan").is_config());
        assert!(SieveError::internal("unexpected state").is_internal());
    }
}
