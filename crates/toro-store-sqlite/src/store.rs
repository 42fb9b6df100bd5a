//! [`SqliteStore`]: the SQLite implementation of [`Repository`].

use std::path::Path;

use rusqlite::{
  Connection, OptionalExtension as _, TransactionBehavior, types::Value,
};
use toro_core::{
  CascadeReport, Draft as _, EntityKind, Id, Patch as _, Reference, Repository,
};

use crate::{
  Result,
  encode::Table,
  schema::{SCHEMA, table_name},
};

/// Outcome of the work done inside a transaction: a record-level error is
/// returned as a value so the transaction is dropped (rolled back) instead of
/// committed.
type Checked<T> = std::result::Result<T, toro_core::Error>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A TORO record store backed by a single SQLite file.
///
/// Clones share the same reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows currently stored for `kind`.
  pub async fn count(&self, kind: EntityKind) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT COUNT(*) FROM {}", table_name(kind));
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  #[cfg(test)]
  pub(crate) fn conn(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── SQL helpers ─────────────────────────────────────────────────────────────

fn select_sql<E: Table>() -> String {
  format!(
    "SELECT id, {} FROM {}",
    E::COLUMNS.join(", "),
    table_name(E::KIND)
  )
}

fn insert_sql<E: Table>() -> String {
  let placeholders = (1..=E::COLUMNS.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    table_name(E::KIND),
    E::COLUMNS.join(", ")
  )
}

fn row_exists(conn: &Connection, kind: EntityKind, id: Id) -> rusqlite::Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table_name(kind));
  Ok(
    conn
      .query_row(&sql, [id.get()], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

/// Every foreign key must point at an existing row of its target kind.
fn check_references(
  conn: &Connection,
  refs: &[Reference],
) -> rusqlite::Result<Checked<()>> {
  for r in refs {
    if !row_exists(conn, r.target, r.id)? {
      return Ok(Err(toro_core::Error::Reference {
        field:  r.field,
        entity: r.target,
        id:     r.id,
      }));
    }
  }
  Ok(Ok(()))
}

/// Remove `id` after first removing, depth-first, every row that depends on
/// it. Must run inside a transaction.
fn cascade_delete(
  conn: &Connection,
  kind: EntityKind,
  id: Id,
  report: &mut CascadeReport,
) -> rusqlite::Result<()> {
  for &(child, field) in kind.dependents() {
    let child_ids: Vec<i64> = {
      let sql = format!(
        "SELECT id FROM {} WHERE {field} = ?1 ORDER BY id",
        table_name(child)
      );
      let mut stmt = conn.prepare(&sql)?;
      let ids = stmt
        .query_map([id.get()], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
      ids
    };

    for child_id in child_ids {
      cascade_delete(conn, child, Id(child_id), report)?;
    }
  }

  let sql = format!("DELETE FROM {} WHERE id = ?1", table_name(kind));
  let removed = conn.execute(&sql, [id.get()])?;
  report.record(kind, removed as u64);
  Ok(())
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl<E: Table> Repository<E> for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, draft: E::Draft) -> Result<Id> {
    let row: E = Repository::<E>::insert(self, draft).await?;
    Ok(row.id())
  }

  async fn insert(&self, draft: E::Draft) -> Result<E> {
    draft.validate()?;
    let refs = draft.references();
    let values = E::draft_values(&draft);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Err(e) = check_references(&tx, &refs)? {
          return Ok(Err(e));
        }
        tx.execute(&insert_sql::<E>(), rusqlite::params_from_iter(values))?;
        let id = tx.last_insert_rowid();
        let sql = format!("{} WHERE id = ?1", select_sql::<E>());
        let raw = tx.query_row(&sql, [id], E::read_raw)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await??;

    let row = E::decode(raw)?;
    tracing::debug!(entity = %E::KIND, id = %row.id(), "created");
    Ok(row)
  }

  async fn get_all(&self) -> Result<Vec<E>> {
    let raws: Vec<E::Raw> = self
      .conn
      .call(|conn| {
        let sql = format!("{} ORDER BY id", select_sql::<E>());
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], E::read_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(E::decode).collect()
  }

  async fn get_by_id(&self, id: Id) -> Result<E> {
    let raw: Option<E::Raw> = self
      .conn
      .call(move |conn| {
        let sql = format!("{} WHERE id = ?1", select_sql::<E>());
        Ok(conn.query_row(&sql, [id.get()], E::read_raw).optional()?)
      })
      .await?;

    let raw = raw.ok_or(toro_core::Error::not_found(E::KIND, id))?;
    E::decode(raw)
  }

  async fn update(&self, id: Id, patch: E::Patch) -> Result<E> {
    let refs = patch.references();
    let sets = E::patch_values(&patch);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !row_exists(&tx, E::KIND, id)? {
          return Ok(Err(toro_core::Error::not_found(E::KIND, id)));
        }
        if let Err(e) = patch.validate() {
          return Ok(Err(e));
        }
        if let Err(e) = check_references(&tx, &refs)? {
          return Ok(Err(e));
        }

        if !sets.is_empty() {
          let assignments = sets
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
          let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            table_name(E::KIND),
            sets.len() + 1
          );
          let params = sets
            .into_iter()
            .map(|(_, value)| value)
            .chain(std::iter::once(Value::Integer(id.get())));
          tx.execute(&sql, rusqlite::params_from_iter(params))?;
        }

        let sql = format!("{} WHERE id = ?1", select_sql::<E>());
        let raw = tx.query_row(&sql, [id.get()], E::read_raw)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await??;

    tracing::debug!(entity = %E::KIND, %id, "updated");
    E::decode(raw)
  }

  async fn delete(&self, id: Id) -> Result<CascadeReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !row_exists(&tx, E::KIND, id)? {
          return Ok(Err(toro_core::Error::not_found(E::KIND, id)));
        }
        let mut report = CascadeReport::default();
        cascade_delete(&tx, E::KIND, id, &mut report)?;
        tx.commit()?;
        Ok(Ok(report))
      })
      .await??;

    tracing::debug!(
      entity = %E::KIND,
      %id,
      rows = report.total(),
      "deleted with cascade"
    );
    Ok(report)
  }
}
