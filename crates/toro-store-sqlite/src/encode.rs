//! Encoding and decoding between the domain record types and SQLite rows.
//!
//! Dates are stored as `YYYY-MM-DD` text. Prices are stored as decimal text
//! with exactly two fractional digits. Identifiers are plain integers.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{Row, types::Value};
use rust_decimal::Decimal;
use toro_core::{
  CompletedWork, CompletedWorkPatch, Entity, Equipment, EquipmentPatch, Event,
  EventPatch, Id, MaintenancePlan, MaintenancePlanPatch, MaterialAsset,
  MaterialAssetPatch, Need, NeedPatch, NewCompletedWork, NewEquipment, NewEvent,
  NewMaintenancePlan, NewMaterialAsset, NewNeed, validate,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_id(id: Id) -> Value { Value::Integer(id.get()) }

pub fn encode_date(d: NaiveDate) -> Value {
  Value::Text(d.format(DATE_FORMAT).to_string())
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn encode_price(p: Decimal) -> Value {
  Value::Text(validate::normalize_price(p).to_string())
}

pub fn decode_price(s: &str) -> Result<Decimal> {
  Decimal::from_str(s)
    .map(validate::normalize_price)
    .map_err(|e| Error::Decode(format!("price {s:?}: {e}")))
}

fn encode_text(s: &str) -> Value { Value::Text(s.to_owned()) }

fn encode_optional_date(d: Option<NaiveDate>) -> Value {
  d.map_or(Value::Null, encode_date)
}

// ─── Table mapping ───────────────────────────────────────────────────────────

/// How a record type maps onto its SQLite table.
///
/// `COLUMNS` lists every column except `id`. `draft_values` must return one
/// value per column in that order; `read_raw` expects `id` followed by the
/// same columns.
pub trait Table: Entity {
  const COLUMNS: &'static [&'static str];

  /// Column values as read, before any decoding that can fail.
  type Raw: Send + 'static;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<Self::Raw>;

  fn decode(raw: Self::Raw) -> Result<Self>;

  fn draft_values(draft: &Self::Draft) -> Vec<Value>;

  /// `(column, value)` for every field the patch sets.
  fn patch_values(patch: &Self::Patch) -> Vec<(&'static str, Value)>;
}

// ─── Equipment ───────────────────────────────────────────────────────────────

pub struct RawEquipment {
  pub id:                    i64,
  pub equipment_type:        String,
  pub name:                  String,
  pub status:                String,
  pub last_maintenance_date: Option<String>,
}

impl Table for Equipment {
  const COLUMNS: &'static [&'static str] =
    &["type", "name", "status", "last_maintenance_date"];

  type Raw = RawEquipment;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawEquipment> {
    Ok(RawEquipment {
      id:                    row.get(0)?,
      equipment_type:        row.get(1)?,
      name:                  row.get(2)?,
      status:                row.get(3)?,
      last_maintenance_date: row.get(4)?,
    })
  }

  fn decode(raw: RawEquipment) -> Result<Self> {
    Ok(Equipment {
      id:                    Id(raw.id),
      equipment_type:        raw.equipment_type,
      name:                  raw.name,
      status:                raw.status,
      last_maintenance_date: raw
        .last_maintenance_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
    })
  }

  fn draft_values(draft: &NewEquipment) -> Vec<Value> {
    vec![
      encode_text(&draft.equipment_type),
      encode_text(&draft.name),
      encode_text(&draft.status),
      encode_optional_date(draft.last_maintenance_date),
    ]
  }

  fn patch_values(patch: &EquipmentPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    if let Some(t) = &patch.equipment_type {
      sets.push(("type", encode_text(t)));
    }
    if let Some(n) = &patch.name {
      sets.push(("name", encode_text(n)));
    }
    if let Some(s) = &patch.status {
      sets.push(("status", encode_text(s)));
    }
    if let Some(d) = patch.last_maintenance_date {
      sets.push(("last_maintenance_date", encode_optional_date(d)));
    }
    sets
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

impl Table for Event {
  const COLUMNS: &'static [&'static str] = &["name", "description"];

  type Raw = Event;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
      id:          Id(row.get(0)?),
      name:        row.get(1)?,
      description: row.get(2)?,
    })
  }

  fn decode(raw: Event) -> Result<Self> { Ok(raw) }

  fn draft_values(draft: &NewEvent) -> Vec<Value> {
    vec![encode_text(&draft.name), encode_text(&draft.description)]
  }

  fn patch_values(patch: &EventPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    if let Some(n) = &patch.name {
      sets.push(("name", encode_text(n)));
    }
    if let Some(d) = &patch.description {
      sets.push(("description", encode_text(d)));
    }
    sets
  }
}

// ─── MaintenancePlan ─────────────────────────────────────────────────────────

impl Table for MaintenancePlan {
  const COLUMNS: &'static [&'static str] =
    &["equipment_id", "event_id", "periodicity"];

  type Raw = MaintenancePlan;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<MaintenancePlan> {
    Ok(MaintenancePlan {
      id:           Id(row.get(0)?),
      equipment_id: Id(row.get(1)?),
      event_id:     Id(row.get(2)?),
      periodicity:  row.get(3)?,
    })
  }

  fn decode(raw: MaintenancePlan) -> Result<Self> { Ok(raw) }

  fn draft_values(draft: &NewMaintenancePlan) -> Vec<Value> {
    vec![
      encode_id(draft.equipment_id),
      encode_id(draft.event_id),
      encode_text(&draft.periodicity),
    ]
  }

  fn patch_values(patch: &MaintenancePlanPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    if let Some(id) = patch.equipment_id {
      sets.push(("equipment_id", encode_id(id)));
    }
    if let Some(id) = patch.event_id {
      sets.push(("event_id", encode_id(id)));
    }
    if let Some(p) = &patch.periodicity {
      sets.push(("periodicity", encode_text(p)));
    }
    sets
  }
}

// ─── MaterialAsset ───────────────────────────────────────────────────────────

pub struct RawMaterialAsset {
  pub id:            i64,
  pub material_name: String,
  pub price:         String,
}

impl Table for MaterialAsset {
  const COLUMNS: &'static [&'static str] = &["material_name", "price"];

  type Raw = RawMaterialAsset;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawMaterialAsset> {
    Ok(RawMaterialAsset {
      id:            row.get(0)?,
      material_name: row.get(1)?,
      price:         row.get(2)?,
    })
  }

  fn decode(raw: RawMaterialAsset) -> Result<Self> {
    Ok(MaterialAsset {
      id:            Id(raw.id),
      material_name: raw.material_name,
      price:         decode_price(&raw.price)?,
    })
  }

  fn draft_values(draft: &NewMaterialAsset) -> Vec<Value> {
    vec![encode_text(&draft.material_name), encode_price(draft.price)]
  }

  fn patch_values(patch: &MaterialAssetPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    if let Some(n) = &patch.material_name {
      sets.push(("material_name", encode_text(n)));
    }
    if let Some(p) = patch.price {
      sets.push(("price", encode_price(p)));
    }
    sets
  }
}

// ─── Need ────────────────────────────────────────────────────────────────────

impl Table for Need {
  const COLUMNS: &'static [&'static str] =
    &["maintenance_plan_id", "material_asset_id", "quantity"];

  type Raw = Need;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<Need> {
    Ok(Need {
      id:                  Id(row.get(0)?),
      maintenance_plan_id: Id(row.get(1)?),
      material_asset_id:   Id(row.get(2)?),
      quantity:            row.get(3)?,
    })
  }

  fn decode(raw: Need) -> Result<Self> { Ok(raw) }

  fn draft_values(draft: &NewNeed) -> Vec<Value> {
    vec![
      encode_id(draft.maintenance_plan_id),
      encode_id(draft.material_asset_id),
      Value::Integer(draft.quantity),
    ]
  }

  fn patch_values(patch: &NeedPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    if let Some(id) = patch.maintenance_plan_id {
      sets.push(("maintenance_plan_id", encode_id(id)));
    }
    if let Some(id) = patch.material_asset_id {
      sets.push(("material_asset_id", encode_id(id)));
    }
    if let Some(q) = patch.quantity {
      sets.push(("quantity", Value::Integer(q)));
    }
    sets
  }
}

// ─── CompletedWork ───────────────────────────────────────────────────────────

pub struct RawCompletedWork {
  pub id:                  i64,
  pub maintenance_plan_id: i64,
  pub completion_date:     String,
}

impl Table for CompletedWork {
  const COLUMNS: &'static [&'static str] =
    &["maintenance_plan_id", "completion_date"];

  type Raw = RawCompletedWork;

  fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawCompletedWork> {
    Ok(RawCompletedWork {
      id:                  row.get(0)?,
      maintenance_plan_id: row.get(1)?,
      completion_date:     row.get(2)?,
    })
  }

  fn decode(raw: RawCompletedWork) -> Result<Self> {
    Ok(CompletedWork {
      id:                  Id(raw.id),
      maintenance_plan_id: Id(raw.maintenance_plan_id),
      completion_date:     decode_date(&raw.completion_date)?,
    })
  }

  fn draft_values(draft: &NewCompletedWork) -> Vec<Value> {
    vec![
      encode_id(draft.maintenance_plan_id),
      encode_date(draft.completion_date),
    ]
  }

  fn patch_values(patch: &CompletedWorkPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    if let Some(id) = patch.maintenance_plan_id {
      sets.push(("maintenance_plan_id", encode_id(id)));
    }
    if let Some(d) = patch.completion_date {
      sets.push(("completion_date", encode_date(d)));
    }
    sets
  }
}
