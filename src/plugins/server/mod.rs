mod handlers;

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{prelude::*, state::AppState};

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));

    let router = Router::new()
      .route("/health", get(handlers::health))
      .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
      .with_state(app);

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    axum::serve(listener, router).await.context("Axum server error")
  }
}
