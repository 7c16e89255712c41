//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, request-level failures. Upstream and
/// transport failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required request field was missing, blank or out of range.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// No classification code could be derived for the identifier.
    #[error("classification unresolved for identifier {0:?}")]
    ClassificationUnresolved(String),

    /// The identifier is not present in the current catalog snapshot.
    ///
    /// This is an expected outcome (e.g. a part that is not catalogued yet).
    #[error("item not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn unresolved(identifier: impl Into<String>) -> Self {
        Self::ClassificationUnresolved(identifier.into())
    }

    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound(identifier.into())
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::ClassificationUnresolved(_) => "classification_unresolved",
            Self::NotFound(_) => "not_found",
        }
    }
}
