use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{referral, subscription, transaction};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum UserRole {
  #[sea_orm(string_value = "DEV")]
  Dev,
  #[sea_orm(string_value = "ADMIN")]
  Admin,
  #[sea_orm(string_value = "USER")]
  #[default]
  User,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Locale {
  #[sea_orm(string_value = "en")]
  #[default]
  En,
  #[sea_orm(string_value = "ru")]
  Ru,
  #[sea_orm(string_value = "uk")]
  Uk,
}

impl Locale {
  /// Maps a Telegram `language_code` onto a supported locale.
  pub fn from_language_code(code: Option<&str>) -> Self {
    match code.map(|c| c.split('-').next().unwrap_or(c)) {
      Some("ru") => Self::Ru,
      Some("uk") => Self::Uk,
      _ => Self::En,
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub telegram_id: i64,
  pub username: Option<String>,
  #[sea_orm(unique)]
  pub referral_code: String,
  pub name: String,
  pub role: UserRole,
  pub language: Locale,
  pub personal_discount: i32,
  pub purchase_discount: i32,
  pub points: i32,
  pub is_blocked: bool,
  pub is_bot_blocked: bool,
  /// Subscription the user is provisioned under, `None` once it is deleted
  pub current_subscription_id: Option<i32>,
  /// Telegram id of the user who invited this one
  pub referrer_id: Option<i64>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "subscription::Entity",
    from = "Column::CurrentSubscriptionId",
    to = "subscription::Column::Id",
    on_delete = "SetNull"
  )]
  CurrentSubscription,
  #[sea_orm(has_many = "subscription::Entity")]
  Subscriptions,
  #[sea_orm(
    belongs_to = "Entity",
    from = "Column::ReferrerId",
    to = "Column::TelegramId",
    on_delete = "SetNull"
  )]
  Referrer,
  #[sea_orm(has_one = "referral::Entity")]
  Referral,
  #[sea_orm(has_many = "transaction::Entity")]
  Transactions,
}

impl Related<subscription::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Subscriptions.def()
  }
}

impl Related<referral::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Referral.def()
  }
}

impl Related<transaction::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Transactions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
