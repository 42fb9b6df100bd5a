//! Error types for `toro-core`.

use thiserror::Error;

use crate::entity::{EntityKind, Id};

/// The three record-level failures a store operation can report.
///
/// None of them leave partial effects behind, and none of them are worth
/// retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("{entity} {id} not found")]
  NotFound { entity: EntityKind, id: Id },

  #[error("{field} references missing {entity} {id}")]
  Reference {
    field:  &'static str,
    entity: EntityKind,
    id:     Id,
  },

  #[error("invalid {field}: {reason}")]
  Validation { field: &'static str, reason: String },
}

impl Error {
  pub fn not_found(entity: EntityKind, id: Id) -> Self {
    Self::NotFound { entity, id }
  }

  pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Validation { field, reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by backend error types so callers can tell record errors
/// apart from storage failures without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The record-level error, if this is one.
  fn record_error(&self) -> Option<&Error>;

  /// Whether the storage layer reported a condition that may clear on its
  /// own (a busy or locked database). Record errors are never transient.
  fn is_transient(&self) -> bool { false }
}

impl StoreError for Error {
  fn record_error(&self) -> Option<&Error> { Some(self) }
}
