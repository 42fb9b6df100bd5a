//! Identity, entity kinds, and the traits every record type implements.
//!
//! The cascade topology lives here as plain data ([`EntityKind::dependents`])
//! so that backends can walk it without knowing the concrete record types.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

// ─── Identifier ──────────────────────────────────────────────────────────────

/// A store-assigned row identifier. Immutable once assigned, never reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id(pub i64);

impl Id {
  pub fn get(self) -> i64 { self.0 }
}

impl From<i64> for Id {
  fn from(value: i64) -> Self { Self(value) }
}

impl fmt::Display for Id {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Entity kinds ────────────────────────────────────────────────────────────

/// The six record types managed by the store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  Equipment,
  Event,
  MaintenancePlan,
  MaterialAsset,
  Need,
  CompletedWork,
}

impl EntityKind {
  pub const ALL: [EntityKind; 6] = [
    EntityKind::Equipment,
    EntityKind::Event,
    EntityKind::MaintenancePlan,
    EntityKind::MaterialAsset,
    EntityKind::Need,
    EntityKind::CompletedWork,
  ];

  pub fn name(self) -> &'static str {
    match self {
      EntityKind::Equipment => "equipment",
      EntityKind::Event => "event",
      EntityKind::MaintenancePlan => "maintenance_plan",
      EntityKind::MaterialAsset => "material_asset",
      EntityKind::Need => "need",
      EntityKind::CompletedWork => "completed_work",
    }
  }

  /// Rows owned by a row of this kind, as `(child kind, foreign-key field)`.
  ///
  /// Deleting a row deletes every child row whose foreign key points at it,
  /// recursively.
  pub fn dependents(self) -> &'static [(EntityKind, &'static str)] {
    match self {
      EntityKind::Equipment => &[(EntityKind::MaintenancePlan, "equipment_id")],
      EntityKind::Event => &[(EntityKind::MaintenancePlan, "event_id")],
      EntityKind::MaintenancePlan => &[
        (EntityKind::Need, "maintenance_plan_id"),
        (EntityKind::CompletedWork, "maintenance_plan_id"),
      ],
      EntityKind::MaterialAsset => &[(EntityKind::Need, "material_asset_id")],
      EntityKind::Need | EntityKind::CompletedWork => &[],
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ─── References ──────────────────────────────────────────────────────────────

/// A foreign key carried by a draft or patch, to be resolved by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
  pub field:  &'static str,
  pub target: EntityKind,
  pub id:     Id,
}

impl Reference {
  pub fn new(field: &'static str, target: EntityKind, id: Id) -> Self {
    Self { field, target, id }
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Input for creating a row.
pub trait Draft: Clone + Send + Sync + DeserializeOwned + 'static {
  /// Check field-level rules. Does not touch the store.
  fn validate(&self) -> Result<()>;

  /// Foreign keys that must resolve before the row is written.
  fn references(&self) -> Vec<Reference> { Vec::new() }
}

/// A partial update. Every `None` field is left unchanged.
pub trait Patch: Clone + Send + Sync + DeserializeOwned + 'static {
  fn validate(&self) -> Result<()>;

  fn references(&self) -> Vec<Reference> { Vec::new() }

  /// `true` if applying the patch would change nothing.
  fn is_empty(&self) -> bool;
}

/// A persisted record type.
pub trait Entity:
  Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
  const KIND: EntityKind;

  type Draft: Draft;
  type Patch: Patch;

  fn id(&self) -> Id;
}
