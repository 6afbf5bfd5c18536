use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{prelude::*, state::AppState};

#[derive(Debug, Serialize)]
pub struct HealthRes {
  pub status: &'static str,
  pub version: &'static str,
}

/// Liveness probe that also pings the database.
pub async fn health(State(app): State<Arc<AppState>>) -> Result<Json<HealthRes>> {
  app.db.ping().await?;
  Ok(Json(HealthRes { status: "ok", version: env!("CARGO_PKG_VERSION") }))
}
