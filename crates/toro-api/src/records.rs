//! Handlers shared by every record type.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/<records>` | All rows, ordered by id |
//! | `POST`   | `/<records>` | Body: the creation draft; returns 201 + stored row |
//! | `GET`    | `/<records>/:id` | 404 if not found |
//! | `PATCH`  | `/<records>/:id` | Body: fields to replace; returns updated row |
//! | `DELETE` | `/<records>/:id` | Returns rows removed per kind |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use toro_core::{CascadeReport, Entity, Id, Repository};

use crate::{AppState, error::ApiError};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  payload
    .map(|Json(value)| value)
    .map_err(|e| ApiError::Unprocessable(e.body_text()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /<records>`
pub async fn list<S, E>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<E>>, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let store = &*state.store;
  let rows = state
    .retry
    .run(move || Repository::<E>::get_all(store))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rows))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /<records>`
pub async fn create<S, E>(
  State(state): State<AppState<S>>,
  payload: Result<Json<E::Draft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let draft = body(payload)?;
  let store = &*state.store;

  let row = state
    .retry
    .run(move || Repository::<E>::insert(store, draft.clone()))
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(entity = %E::KIND, id = %row.id(), "record created");
  Ok((StatusCode::CREATED, Json(row)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /<records>/:id`
pub async fn get_one<S, E>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<Json<E>, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let store = &*state.store;
  let row = state
    .retry
    .run(move || Repository::<E>::get_by_id(store, id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(row))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /<records>/:id`
pub async fn update<S, E>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  payload: Result<Json<E::Patch>, JsonRejection>,
) -> Result<Json<E>, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let patch = body(payload)?;
  let store = &*state.store;

  let row = state
    .retry
    .run(move || Repository::<E>::update(store, id, patch.clone()))
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(entity = %E::KIND, %id, "record updated");
  Ok(Json(row))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /<records>/:id`
pub async fn delete<S, E>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: Repository<E>,
  E: Entity,
{
  let store = &*state.store;
  let report = state
    .retry
    .run(move || Repository::<E>::delete(store, id))
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    entity = %E::KIND,
    %id,
    rows = report.total(),
    "record deleted"
  );
  Ok(Json(report))
}
