//! Roster-level error taxonomy.
//!
//! # Responsibility
//! - Describe every failure a roster caller can observe as a plain value.
//! - Tell callers which failures mean the local view has drifted.
//!
//! # Invariants
//! - No variant is fatal; the worst case is a stale roster fixed by `load`.
//! - Repository failures are carried unchanged in `ExternalOperationFailed`.

use crate::model::person::{PersonId, PersonValidationError};
use crate::repo::person_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RosterResult<T> = Result<T, RosterError>;

/// CRUD call against the authoritative store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOperation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl ExternalOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for ExternalOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum RosterError {
    /// Input rejected locally before any store call.
    Validation(PersonValidationError),
    /// Replace target is not part of the local roster.
    NotFound(PersonId),
    /// Insert target is already part of the local roster.
    InvariantViolation(PersonId),
    /// The authoritative store rejected or failed the call.
    ExternalOperationFailed {
        operation: ExternalOperation,
        source: RepoError,
    },
}

impl RosterError {
    /// Returns whether the local roster should be reloaded from the store.
    pub fn needs_resync(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvariantViolation(_))
    }

    /// Stable machine-readable code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::InvariantViolation(_) => "duplicate_id",
            Self::ExternalOperationFailed { .. } => "external_operation_failed",
        }
    }
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found in roster: {id}"),
            Self::InvariantViolation(id) => {
                write!(f, "person already present in roster: {id}")
            }
            Self::ExternalOperationFailed { operation, source } => {
                write!(f, "store {operation} failed: {source}")
            }
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ExternalOperationFailed { source, .. } => Some(source),
            Self::NotFound(_) | Self::InvariantViolation(_) => None,
        }
    }
}

impl From<PersonValidationError> for RosterError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}
