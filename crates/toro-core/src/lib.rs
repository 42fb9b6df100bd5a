//! Core types and trait definitions for the TORO maintenance record store.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! describes the six record types, how they reference each other, how a
//! delete cascades through them, and what a storage backend has to provide.

pub mod entity;
pub mod error;
pub mod records;
pub mod store;
pub mod validate;

pub use entity::{Draft, Entity, EntityKind, Id, Patch, Reference};
pub use error::{Error, Result, StoreError};
pub use records::{
  CompletedWork, CompletedWorkPatch, Equipment, EquipmentPatch, Event,
  EventPatch, MaintenancePlan, MaintenancePlanPatch, MaterialAsset,
  MaterialAssetPatch, Need, NeedPatch, NewCompletedWork, NewEquipment,
  NewEvent, NewMaintenancePlan, NewMaterialAsset, NewNeed,
};
pub use store::{CascadeReport, RecordStore, Repository};
