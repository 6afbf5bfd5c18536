use std::{collections::HashSet, env};

use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveEnum, Database, Iterable};
use teloxide::Bot;

use crate::{entity::PaymentGatewayType, prelude::*, remnawave, sv};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub bot_token: String,
  /// Username of the support account, with or without `@`
  pub support_username: String,
  pub mini_app_url: String,
  pub remnawave_url: String,
  pub remnawave_token: String,
  pub port: u16,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:shop.db?mode=rwc"),
      bot_token: String::new(),
      support_username: String::new(),
      mini_app_url: String::new(),
      remnawave_url: String::from("http://localhost:3000/"),
      remnawave_token: String::new(),
      port: 3000,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let required =
      |key: &str| env::var(key).with_context(|| format!("{key} not set"));
    let defaults = Self::default();

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
      bot_token: required("TELOXIDE_TOKEN")?,
      support_username: required("BOT_SUPPORT_USERNAME")?,
      mini_app_url: required("BOT_MINI_APP_URL")?,
      remnawave_url: required("REMNAWAVE_URL")?,
      remnawave_token: required("REMNAWAVE_TOKEN")?,
      port: match env::var("PORT") {
        Ok(port) => port.parse().context("Invalid PORT")?,
        Err(_) => defaults.port,
      },
    })
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub subscription: sv::Subscription<'a>,
  pub plan: sv::Plan<'a>,
  pub transaction: sv::Transaction<'a>,
}

impl<'a> Services<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self {
      user: sv::User::new(db),
      subscription: sv::Subscription::new(db),
      plan: sv::Plan::new(db),
      transaction: sv::Transaction::new(db),
    }
  }
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub bot: Bot,
  pub panel: remnawave::Client,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str())
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    let panel =
      remnawave::Client::new(&config.remnawave_url, &config.remnawave_token)?;

    let app = Self { db, bot: Bot::new(&config.bot_token), panel, config };
    app.check_gateways().await?;

    Ok(app)
  }

  pub fn sv(&self) -> Services<'_> {
    Services::new(&self.db)
  }

  /// Warns when the gateway lookup table and [`PaymentGatewayType`] diverge.
  async fn check_gateways(&self) -> Result<()> {
    let stored: HashSet<String> = self
      .sv()
      .transaction
      .gateways()
      .await?
      .into_iter()
      .map(|gateway| gateway.code)
      .collect();

    for gateway in PaymentGatewayType::iter() {
      if !stored.contains(&gateway.to_value()) {
        warn!("Payment gateway {gateway:?} is missing from the database");
      }
    }

    Ok(())
  }
}
