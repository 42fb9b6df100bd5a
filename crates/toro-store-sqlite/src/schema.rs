//! SQL schema for the TORO SQLite store.
//!
//! Executed once at connection startup.

use toro_core::EntityKind;

/// Table holding rows of `kind`.
pub const fn table_name(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Equipment => "equipment",
    EntityKind::Event => "events",
    EntityKind::MaintenancePlan => "maintenance_plans",
    EntityKind::MaterialAsset => "material_assets",
    EntityKind::Need => "needs",
    EntityKind::CompletedWork => "completed_work",
  }
}

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row
/// again. The `ON DELETE CASCADE` clauses mirror the cascade the store
/// performs itself, so rows removed outside the store cannot orphan
/// dependents either.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS equipment (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    type                  TEXT NOT NULL,
    name                  TEXT NOT NULL,
    status                TEXT NOT NULL,
    last_maintenance_date TEXT             -- YYYY-MM-DD or NULL
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS maintenance_plans (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    equipment_id INTEGER NOT NULL REFERENCES equipment(id) ON DELETE CASCADE,
    event_id     INTEGER NOT NULL REFERENCES events(id)    ON DELETE CASCADE,
    periodicity  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS material_assets (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    material_name TEXT NOT NULL,
    price         TEXT NOT NULL        -- decimal, exactly two fractional digits
);

CREATE TABLE IF NOT EXISTS needs (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    maintenance_plan_id INTEGER NOT NULL
                        REFERENCES maintenance_plans(id) ON DELETE CASCADE,
    material_asset_id   INTEGER NOT NULL
                        REFERENCES material_assets(id)   ON DELETE CASCADE,
    quantity            INTEGER NOT NULL CHECK (quantity >= 0)
);

CREATE TABLE IF NOT EXISTS completed_work (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    maintenance_plan_id INTEGER NOT NULL
                        REFERENCES maintenance_plans(id) ON DELETE CASCADE,
    completion_date     TEXT NOT NULL  -- YYYY-MM-DD
);

CREATE INDEX IF NOT EXISTS plans_equipment_idx ON maintenance_plans(equipment_id);
CREATE INDEX IF NOT EXISTS plans_event_idx     ON maintenance_plans(event_id);
CREATE INDEX IF NOT EXISTS needs_plan_idx      ON needs(maintenance_plan_id);
CREATE INDEX IF NOT EXISTS needs_asset_idx     ON needs(material_asset_id);
CREATE INDEX IF NOT EXISTS completed_plan_idx  ON completed_work(maintenance_plan_id);

PRAGMA user_version = 1;
";
