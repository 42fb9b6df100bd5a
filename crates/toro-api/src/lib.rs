//! JSON REST API for the TORO record store.
//!
//! Exposes an axum [`Router`] backed by any [`toro_core::RecordStore`]. Every
//! record type gets the same five routes (see [`records`]). Auth, TLS, and
//! page rendering are the caller's responsibility.
//!
//! | Prefix | Record |
//! |--------|--------|
//! | `/equipment` | [`Equipment`] |
//! | `/events` | [`Event`] |
//! | `/plans` | [`MaintenancePlan`] |
//! | `/assets` | [`MaterialAsset`] |
//! | `/needs` | [`Need`] |
//! | `/completed` | [`CompletedWork`] |

pub mod error;
pub mod records;
pub mod retry;

use std::sync::Arc;

use axum::{Router, routing::get};
use toro_core::{
  CompletedWork, Entity, Equipment, Event, MaintenancePlan, MaterialAsset, Need,
  RecordStore, Repository,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use retry::RetryPolicy;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub retry: RetryPolicy,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), retry: self.retry }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, retry: RetryPolicy) -> Router<()>
where
  S: RecordStore + 'static,
{
  let router = Router::new();
  let router = resource::<S, Equipment>(router, "equipment");
  let router = resource::<S, Event>(router, "events");
  let router = resource::<S, MaintenancePlan>(router, "plans");
  let router = resource::<S, MaterialAsset>(router, "assets");
  let router = resource::<S, Need>(router, "needs");
  let router = resource::<S, CompletedWork>(router, "completed");

  router
    .layer(TraceLayer::new_for_http())
    .with_state(AppState { store, retry })
}

/// Mount the five record routes for `E` under `/{prefix}`.
fn resource<S, E>(
  router: Router<AppState<S>>,
  prefix: &str,
) -> Router<AppState<S>>
where
  S: Repository<E> + 'static,
  E: Entity,
{
  router
    .route(
      &format!("/{prefix}"),
      get(records::list::<S, E>).post(records::create::<S, E>),
    )
    .route(
      &format!("/{prefix}/{{id}}"),
      get(records::get_one::<S, E>)
        .patch(records::update::<S, E>)
        .delete(records::delete::<S, E>),
    )
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use toro_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store), RetryPolicy::none())
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn post(app: &Router, uri: &str, body: Value) -> Value {
    let resp = send(app, "POST", uri, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  // ── Create / read ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_equipment_returns_stored_row() {
    let app = app().await;
    let row = post(
      &app,
      "/equipment",
      json!({ "type": "Mower", "name": "M1", "status": "active" }),
    )
    .await;

    assert_eq!(row["id"], 1);
    assert_eq!(row["type"], "Mower");
    assert_eq!(row["last_maintenance_date"], Value::Null);

    let resp = send(&app, "GET", "/equipment/1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, row);
  }

  #[tokio::test]
  async fn list_is_empty_then_ordered() {
    let app = app().await;
    let resp = send(&app, "GET", "/events", None).await;
    assert_eq!(json_body(resp).await, json!([]));

    post(&app, "/events", json!({ "name": "Oil change" })).await;
    post(&app, "/events", json!({ "name": "Blade sharpening", "description": "..." }))
      .await;

    let list = json_body(send(&app, "GET", "/events", None).await).await;
    assert_eq!(list[0]["name"], "Oil change");
    assert_eq!(list[0]["description"], "");
    assert_eq!(list[1]["id"], 2);
  }

  #[tokio::test]
  async fn asset_price_is_serialised_with_two_decimals() {
    let app = app().await;
    let row = post(
      &app,
      "/assets",
      json!({ "material_name": "Blade", "price": "12.5" }),
    )
    .await;
    assert_eq!(row["price"], "12.50");
  }

  #[tokio::test]
  async fn missing_row_is_404() {
    let app = app().await;
    let resp = send(&app, "GET", "/plans/9", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "maintenance_plan 9 not found");
  }

  // ── Errors ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dangling_reference_is_409() {
    let app = app().await;
    post(&app, "/events", json!({ "name": "Inspection" })).await;

    let resp = send(
      &app,
      "POST",
      "/plans",
      Some(json!({ "equipment_id": 5, "event_id": 1, "periodicity": "weekly" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let list = json_body(send(&app, "GET", "/plans", None).await).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn invalid_input_is_422() {
    let app = app().await;

    let resp = send(
      &app,
      "POST",
      "/completed",
      Some(json!({ "maintenance_plan_id": 1, "completion_date": "yesterday" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(
      &app,
      "POST",
      "/equipment",
      Some(json!({ "type": "Mower", "name": " ", "status": "active" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Update / delete ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_updates_named_fields() {
    let app = app().await;
    post(
      &app,
      "/equipment",
      json!({
        "type": "Mower", "name": "M1", "status": "active",
        "last_maintenance_date": "2024-01-10"
      }),
    )
    .await;

    let resp = send(&app, "PATCH", "/equipment/1", Some(json!({ "status": "idle" })))
      .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let row = json_body(resp).await;
    assert_eq!(row["status"], "idle");
    assert_eq!(row["last_maintenance_date"], "2024-01-10");

    let resp = send(&app, "PATCH", "/equipment/2", Some(json!({ "status": "idle" })))
      .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_equipment_reports_cascade() {
    let app = app().await;
    post(&app, "/equipment", json!({ "type": "Mower", "name": "M1", "status": "active" }))
      .await;
    post(&app, "/events", json!({ "name": "Blade sharpening" })).await;
    post(&app, "/assets", json!({ "material_name": "Blade", "price": "20.00" })).await;
    post(
      &app,
      "/plans",
      json!({ "equipment_id": 1, "event_id": 1, "periodicity": "monthly" }),
    )
    .await;
    post(
      &app,
      "/needs",
      json!({ "maintenance_plan_id": 1, "material_asset_id": 1, "quantity": 2 }),
    )
    .await;
    post(
      &app,
      "/completed",
      json!({ "maintenance_plan_id": 1, "completion_date": "2024-05-05" }),
    )
    .await;

    let resp = send(&app, "DELETE", "/equipment/1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report = json_body(resp).await;
    assert_eq!(
      report,
      json!({ "removed": {
        "equipment": 1, "maintenance_plan": 1, "need": 1, "completed_work": 1
      } })
    );

    let resp = send(&app, "GET", "/needs/1", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(&app, "GET", "/events/1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
