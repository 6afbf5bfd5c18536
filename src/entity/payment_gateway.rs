//! Lookup table of payment gateways. New gateways are appended by migrations
//! instead of altering a native enum type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentGatewayType {
  #[sea_orm(string_value = "TELEGRAM_STARS")]
  TelegramStars,
  #[sea_orm(string_value = "YOOKASSA")]
  Yookassa,
  #[sea_orm(string_value = "YOOMONEY")]
  Yoomoney,
  #[sea_orm(string_value = "CRYPTOMUS")]
  Cryptomus,
  #[sea_orm(string_value = "HELEKET")]
  Heleket,
  #[sea_orm(string_value = "CRYPTOPAY")]
  Cryptopay,
  #[sea_orm(string_value = "ROBOKASSA")]
  Robokassa,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_gateway_types")]
pub struct Model {
  /// String value of a [`PaymentGatewayType`]
  #[sea_orm(primary_key, auto_increment = false)]
  pub code: String,
  #[sea_orm(unique)]
  pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
