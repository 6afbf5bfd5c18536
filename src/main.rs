//! VPN shop backend
//!
//! - SeaORM for storage (SQLite) with migrations from the `migration` crate
//! - Teloxide bot rendering the menu, devices and invite screens
//! - Axum health endpoint
//! - Remnawave panel client for device lookups

mod entity;
mod error;
mod model;
mod plugins;
mod prelude;
mod remnawave;
mod screen;
mod state;
mod sv;
mod utils;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
  plugins::{App, server, telegram},
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "vpn_shop=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  info!("Starting VPN shop v{}", env!("CARGO_PKG_VERSION"));

  let config = Config::from_env()?;
  let app = Arc::new(AppState::new(config).await?);

  App::new()
    .register(telegram::Plugin)
    .register(server::Plugin)
    .run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down");

  Ok(())
}
