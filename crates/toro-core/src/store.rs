//! The `Repository` trait and the cascade report returned by deletes.
//!
//! The trait is implemented by storage backends (e.g. `toro-store-sqlite`).
//! Higher layers (`toro-api`, `toro-server`) depend on this abstraction, not
//! on any concrete backend.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Entity, EntityKind, Id},
  error::StoreError,
  records::{CompletedWork, Equipment, Event, MaintenancePlan, MaterialAsset, Need},
};

// ─── Cascade report ──────────────────────────────────────────────────────────

/// Rows removed by a single delete, per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
  pub removed: BTreeMap<EntityKind, u64>,
}

impl CascadeReport {
  pub fn record(&mut self, kind: EntityKind, rows: u64) {
    if rows > 0 {
      *self.removed.entry(kind).or_default() += rows;
    }
  }

  pub fn removed(&self, kind: EntityKind) -> u64 {
    self.removed.get(&kind).copied().unwrap_or(0)
  }

  pub fn total(&self) -> u64 { self.removed.values().sum() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Create/read/update/delete for one entity type.
///
/// Every operation is a single atomic unit: it either fully applies
/// (including every cascaded delete) or leaves the store untouched.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Repository<E: Entity>: Send + Sync {
  type Error: StoreError;

  /// Validate and persist a new row, returning its assigned identifier.
  ///
  /// Fails with a reference error if any foreign key does not resolve; no
  /// row is written in that case.
  fn create(
    &self,
    draft: E::Draft,
  ) -> impl Future<Output = Result<Id, Self::Error>> + Send + '_;

  /// Like [`create`](Self::create), but returns the stored row as read back
  /// in the same transaction as the insert.
  fn insert(
    &self,
    draft: E::Draft,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Every row of this type, ordered by identifier.
  fn get_all(&self) -> impl Future<Output = Result<Vec<E>, Self::Error>> + Send + '_;

  /// Fails with a not-found error if no row has `id`.
  fn get_by_id(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Replace the fields set in `patch` and return the updated row.
  fn update(
    &self,
    id: Id,
    patch: E::Patch,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Remove the row and, depth-first, every row that depends on it.
  fn delete(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<CascadeReport, Self::Error>> + Send + '_;
}

/// A backend that stores all six record types.
pub trait RecordStore:
  Repository<Equipment>
  + Repository<Event>
  + Repository<MaintenancePlan>
  + Repository<MaterialAsset>
  + Repository<Need>
  + Repository<CompletedWork>
{
}

impl<T> RecordStore for T where
  T: Repository<Equipment>
    + Repository<Event>
    + Repository<MaintenancePlan>
    + Repository<MaterialAsset>
    + Repository<Need>
    + Repository<CompletedWork>
{
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cascade_report_totals_rows() {
    let mut report = CascadeReport::default();
    report.record(EntityKind::Need, 4);
    report.record(EntityKind::CompletedWork, 0);
    report.record(EntityKind::MaintenancePlan, 2);
    report.record(EntityKind::Equipment, 1);

    assert_eq!(report.total(), 7);
    assert_eq!(report.removed(EntityKind::CompletedWork), 0);
    assert!(!report.removed.contains_key(&EntityKind::CompletedWork));
  }
}
