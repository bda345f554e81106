//! Unified error types for the domain layer
//!
//! Provides a common error type for rejected mutations and template construction,
//! so adapters never have to fall back to String or anyhow.

use thiserror::Error;

use crate::templates::FieldDiagnostic;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// An item template could not be composed from its fragments
    #[error("Template error for {kind}: {message}")]
    Template { kind: String, message: String },

    /// The field is owned by another edit path (e.g. a linked resource)
    #[error("Field {field} is locked by resource {resource_id}")]
    LockedField { field: String, resource_id: String },

    /// An item's counter already belongs to another resource
    #[error("Item {item_id} is already linked to resource {resource_id}")]
    ItemAlreadyLinked { item_id: String, resource_id: String },
}

impl DomainError {
    /// Creates a validation error for field values that fail their declaration.
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a template composition error
    pub fn template(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a locked field error
    pub fn locked_field(field: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::LockedField {
            field: field.into(),
            resource_id: resource_id.into(),
        }
    }

    pub fn item_already_linked(item_id: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::ItemAlreadyLinked {
            item_id: item_id.into(),
            resource_id: resource_id.into(),
        }
    }
}

impl From<FieldDiagnostic> for DomainError {
    fn from(diagnostic: FieldDiagnostic) -> Self {
        Self::Validation(diagnostic.to_string())
    }
}
