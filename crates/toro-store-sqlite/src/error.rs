//! Error type for `toro-store-sqlite`.

use thiserror::Error;
use toro_core::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  /// Not-found, reference, or validation failure. Nothing was written.
  #[error(transparent)]
  Core(#[from] toro_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored column could not be turned back into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl StoreError for Error {
  fn record_error(&self) -> Option<&toro_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }

  fn is_transient(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => matches!(
        e.code,
        rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
      ),
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
