//! Error types for the shop backend

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

/// Ways a referral link can be refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Referral {
  #[error("a user cannot refer themselves")]
  SelfReferral,
  #[error("user is already referred by someone else")]
  AlreadyReferred,
  #[error("referral would create a cycle")]
  Cycle,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("User not found")]
  UserNotFound,

  #[error("Transaction not found")]
  TransactionNotFound,

  #[error("Current subscription for user `{0}` not found")]
  NoCurrentSubscription(i64),

  #[error("Referral rejected: {0}")]
  Referral(#[from] Referral),

  #[error("Telegram error: {0}")]
  Telegram(#[from] teloxide::RequestError),

  #[error("Panel request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Serialization error: {0}")]
  Json(#[from] json::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Database(_) => {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
      }
      Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
      Error::TransactionNotFound => {
        (StatusCode::NOT_FOUND, "Transaction not found")
      }
      Error::NoCurrentSubscription(_) => {
        (StatusCode::NOT_FOUND, "No current subscription")
      }
      Error::Referral(_) => (StatusCode::CONFLICT, "Referral rejected"),
      _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    };

    tracing::error!("Request failed: {self}");
    (status, Json(json::json!({ "error": message }))).into_response()
  }
}
