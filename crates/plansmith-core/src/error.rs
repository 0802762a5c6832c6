//! Error types for Plansmith

use thiserror::Error;

/// Problems detected while validating a problem or a configuration.
///
/// Every variant is raised before the first search step. Once searching
/// starts the solver always returns a best-effort result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A planning variable resolved to a value range without values.
    #[error("value range '{range}' of {entity_class}.{variable} is empty")]
    EmptyValueRange {
        entity_class: String,
        variable: String,
        range: String,
    },

    /// A planning variable names a value range that was never declared.
    #[error("value range '{range}' referenced by {entity_class}.{variable} is not declared")]
    UnknownValueRange {
        entity_class: String,
        variable: String,
        range: String,
    },

    /// Two facts or entities of one class share a planning id.
    #[error("duplicate planning id {id} in class '{class}'")]
    DuplicateId { class: String, id: i64 },

    /// A class declares no planning id field.
    #[error("class '{class}' declares no planning id field")]
    MissingPlanningId { class: String },

    /// A record of a class carries no usable planning id value.
    #[error("record #{index} of class '{class}' has no integer planning id")]
    InvalidPlanningId { class: String, index: usize },

    /// A seeded planning value lies outside its variable's range.
    #[error("value {value} of {entity_class}.{variable} (id {entity_id}) is outside its value range")]
    ValueOutOfRange {
        entity_class: String,
        variable: String,
        entity_id: i64,
        value: String,
    },

    /// A class name does not exist in the solution descriptor.
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    /// A field name does not exist on its class.
    #[error("unknown field '{field}' on class '{class}'")]
    UnknownField { class: String, field: String },

    /// The solver configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for Plansmith operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;
