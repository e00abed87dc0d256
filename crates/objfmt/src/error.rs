//! Error types for configuration and value extraction.

use thiserror::Error;

/// Errors raised while installing a type configuration.
///
/// These surface once, at setup time, and are fatal to the registration
/// being installed (never to rendering).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A non-optional field binding named a field the shape does not declare.
    #[error("type '{type_name}' declares no field named '{field}'")]
    UnknownField { type_name: String, field: String },

    /// A non-optional method binding named an accessor the shape does not declare.
    #[error("type '{type_name}' declares no accessor named '{method}'")]
    UnknownAccessor { type_name: String, method: String },

    /// A bulk binding pattern failed to compile.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },
}

/// Errors raised while extracting or transforming one item's value.
///
/// Extraction errors are always contained: the engine folds them into an
/// error-marker cell and keeps rendering the surrounding structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The item has no member, format, or self binding.
    #[error("item '{label}' has no extraction rule")]
    MissingRule { label: String },

    /// A field binding was applied to a record lacking that field.
    #[error("no field '{field}' on {type_name}")]
    NoSuchField { type_name: String, field: String },

    /// A field binding was applied to a non-record value.
    #[error("field '{field}' requested on non-record value")]
    NotARecord { field: String },

    /// A caller-supplied accessor or format function reported failure.
    #[error("{0}")]
    Failed(String),
}

impl ExtractError {
    /// Convenience constructor for caller-supplied functions.
    pub fn failure(message: impl Into<String>) -> Self {
        ExtractError::Failed(message.into())
    }
}

/// Returned when a textual level name does not map to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no renderer for requested level '{0}'")]
pub struct UnsupportedLevel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_type() {
        let err = ConfigError::UnknownField {
            type_name: "bundle".to_string(),
            field: "bogus".to_string(),
        };
        assert!(err.to_string().contains("bundle"));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn missing_rule_names_the_item() {
        let err = ExtractError::MissingRule {
            label: "PRICE".to_string(),
        };
        assert!(err.to_string().contains("PRICE"));
    }

    #[test]
    fn failure_constructor_keeps_message() {
        assert_eq!(
            ExtractError::failure("boom").to_string(),
            "boom"
        );
    }
}
