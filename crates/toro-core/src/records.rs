//! The six record types, their creation drafts, and their patches.
//!
//! | Record | Owns (cascade) | References |
//! |--------|----------------|------------|
//! | [`Equipment`] | maintenance plans | |
//! | [`Event`] | maintenance plans | |
//! | [`MaintenancePlan`] | needs, completed work | equipment, event |
//! | [`MaterialAsset`] | needs | |
//! | [`Need`] | | maintenance plan, material asset |
//! | [`CompletedWork`] | | maintenance plan |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
  entity::{Draft, Entity, EntityKind, Id, Patch, Reference},
  error::Result,
  validate,
};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in patches.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── Equipment ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
  pub id:                    Id,
  #[serde(rename = "type")]
  pub equipment_type:        String,
  pub name:                  String,
  pub status:                String,
  pub last_maintenance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEquipment {
  #[serde(rename = "type")]
  pub equipment_type:        String,
  pub name:                  String,
  pub status:                String,
  #[serde(default)]
  pub last_maintenance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EquipmentPatch {
  #[serde(rename = "type")]
  pub equipment_type:        Option<String>,
  pub name:                  Option<String>,
  pub status:                Option<String>,
  /// `Some(None)` clears the date.
  #[serde(default, deserialize_with = "double_option")]
  pub last_maintenance_date: Option<Option<NaiveDate>>,
}

impl Entity for Equipment {
  const KIND: EntityKind = EntityKind::Equipment;
  type Draft = NewEquipment;
  type Patch = EquipmentPatch;

  fn id(&self) -> Id { self.id }
}

impl Draft for NewEquipment {
  fn validate(&self) -> Result<()> {
    validate::required_text("type", &self.equipment_type)?;
    validate::required_text("name", &self.name)?;
    validate::required_text("status", &self.status)
  }
}

impl Patch for EquipmentPatch {
  fn validate(&self) -> Result<()> {
    if let Some(t) = &self.equipment_type {
      validate::required_text("type", t)?;
    }
    if let Some(n) = &self.name {
      validate::required_text("name", n)?;
    }
    if let Some(s) = &self.status {
      validate::required_text("status", s)?;
    }
    Ok(())
  }

  fn is_empty(&self) -> bool {
    self.equipment_type.is_none()
      && self.name.is_none()
      && self.status.is_none()
      && self.last_maintenance_date.is_none()
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id:          Id,
  pub name:        String,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPatch {
  pub name:        Option<String>,
  pub description: Option<String>,
}

impl Entity for Event {
  const KIND: EntityKind = EntityKind::Event;
  type Draft = NewEvent;
  type Patch = EventPatch;

  fn id(&self) -> Id { self.id }
}

impl Draft for NewEvent {
  fn validate(&self) -> Result<()> { validate::required_text("name", &self.name) }
}

impl Patch for EventPatch {
  fn validate(&self) -> Result<()> {
    match &self.name {
      Some(n) => validate::required_text("name", n),
      None => Ok(()),
    }
  }

  fn is_empty(&self) -> bool { self.name.is_none() && self.description.is_none() }
}

// ─── MaintenancePlan ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenancePlan {
  pub id:           Id,
  pub equipment_id: Id,
  pub event_id:     Id,
  pub periodicity:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaintenancePlan {
  pub equipment_id: Id,
  pub event_id:     Id,
  pub periodicity:  String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MaintenancePlanPatch {
  pub equipment_id: Option<Id>,
  pub event_id:     Option<Id>,
  pub periodicity:  Option<String>,
}

impl Entity for MaintenancePlan {
  const KIND: EntityKind = EntityKind::MaintenancePlan;
  type Draft = NewMaintenancePlan;
  type Patch = MaintenancePlanPatch;

  fn id(&self) -> Id { self.id }
}

impl Draft for NewMaintenancePlan {
  fn validate(&self) -> Result<()> {
    validate::required_text("periodicity", &self.periodicity)
  }

  fn references(&self) -> Vec<Reference> {
    vec![
      Reference::new("equipment_id", EntityKind::Equipment, self.equipment_id),
      Reference::new("event_id", EntityKind::Event, self.event_id),
    ]
  }
}

impl Patch for MaintenancePlanPatch {
  fn validate(&self) -> Result<()> {
    match &self.periodicity {
      Some(p) => validate::required_text("periodicity", p),
      None => Ok(()),
    }
  }

  fn references(&self) -> Vec<Reference> {
    let mut refs = Vec::new();
    if let Some(id) = self.equipment_id {
      refs.push(Reference::new("equipment_id", EntityKind::Equipment, id));
    }
    if let Some(id) = self.event_id {
      refs.push(Reference::new("event_id", EntityKind::Event, id));
    }
    refs
  }

  fn is_empty(&self) -> bool {
    self.equipment_id.is_none()
      && self.event_id.is_none()
      && self.periodicity.is_none()
  }
}

// ─── MaterialAsset ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialAsset {
  pub id:            Id,
  pub material_name: String,
  /// Always carries exactly two fractional digits.
  pub price:         Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaterialAsset {
  pub material_name: String,
  pub price:         Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MaterialAssetPatch {
  pub material_name: Option<String>,
  pub price:         Option<Decimal>,
}

impl Entity for MaterialAsset {
  const KIND: EntityKind = EntityKind::MaterialAsset;
  type Draft = NewMaterialAsset;
  type Patch = MaterialAssetPatch;

  fn id(&self) -> Id { self.id }
}

impl Draft for NewMaterialAsset {
  fn validate(&self) -> Result<()> {
    validate::required_text("material_name", &self.material_name)?;
    validate::price("price", self.price)
  }
}

impl Patch for MaterialAssetPatch {
  fn validate(&self) -> Result<()> {
    if let Some(n) = &self.material_name {
      validate::required_text("material_name", n)?;
    }
    if let Some(p) = self.price {
      validate::price("price", p)?;
    }
    Ok(())
  }

  fn is_empty(&self) -> bool { self.material_name.is_none() && self.price.is_none() }
}

// ─── Need ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Need {
  pub id:                  Id,
  pub maintenance_plan_id: Id,
  pub material_asset_id:   Id,
  pub quantity:            i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNeed {
  pub maintenance_plan_id: Id,
  pub material_asset_id:   Id,
  pub quantity:            i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NeedPatch {
  pub maintenance_plan_id: Option<Id>,
  pub material_asset_id:   Option<Id>,
  pub quantity:            Option<i64>,
}

impl Entity for Need {
  const KIND: EntityKind = EntityKind::Need;
  type Draft = NewNeed;
  type Patch = NeedPatch;

  fn id(&self) -> Id { self.id }
}

impl Draft for NewNeed {
  fn validate(&self) -> Result<()> { validate::quantity("quantity", self.quantity) }

  fn references(&self) -> Vec<Reference> {
    vec![
      Reference::new(
        "maintenance_plan_id",
        EntityKind::MaintenancePlan,
        self.maintenance_plan_id,
      ),
      Reference::new(
        "material_asset_id",
        EntityKind::MaterialAsset,
        self.material_asset_id,
      ),
    ]
  }
}

impl Patch for NeedPatch {
  fn validate(&self) -> Result<()> {
    match self.quantity {
      Some(q) => validate::quantity("quantity", q),
      None => Ok(()),
    }
  }

  fn references(&self) -> Vec<Reference> {
    let mut refs = Vec::new();
    if let Some(id) = self.maintenance_plan_id {
      refs.push(Reference::new(
        "maintenance_plan_id",
        EntityKind::MaintenancePlan,
        id,
      ));
    }
    if let Some(id) = self.material_asset_id {
      refs.push(Reference::new(
        "material_asset_id",
        EntityKind::MaterialAsset,
        id,
      ));
    }
    refs
  }

  fn is_empty(&self) -> bool {
    self.maintenance_plan_id.is_none()
      && self.material_asset_id.is_none()
      && self.quantity.is_none()
  }
}

// ─── CompletedWork ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedWork {
  pub id:                  Id,
  pub maintenance_plan_id: Id,
  pub completion_date:     NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompletedWork {
  pub maintenance_plan_id: Id,
  pub completion_date:     NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletedWorkPatch {
  pub maintenance_plan_id: Option<Id>,
  pub completion_date:     Option<NaiveDate>,
}

impl Entity for CompletedWork {
  const KIND: EntityKind = EntityKind::CompletedWork;
  type Draft = NewCompletedWork;
  type Patch = CompletedWorkPatch;

  fn id(&self) -> Id { self.id }
}

impl Draft for NewCompletedWork {
  fn validate(&self) -> Result<()> { Ok(()) }

  fn references(&self) -> Vec<Reference> {
    vec![Reference::new(
      "maintenance_plan_id",
      EntityKind::MaintenancePlan,
      self.maintenance_plan_id,
    )]
  }
}

impl Patch for CompletedWorkPatch {
  fn validate(&self) -> Result<()> { Ok(()) }

  fn references(&self) -> Vec<Reference> {
    self
      .maintenance_plan_id
      .map(|id| {
        Reference::new("maintenance_plan_id", EntityKind::MaintenancePlan, id)
      })
      .into_iter()
      .collect()
  }

  fn is_empty(&self) -> bool {
    self.maintenance_plan_id.is_none() && self.completion_date.is_none()
  }
}
