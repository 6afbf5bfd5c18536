//! Bookkeeping record written when a user joins through someone's invite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referrals")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub referrer_telegram_id: i64,
  #[sea_orm(unique)]
  pub referred_telegram_id: i64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::ReferredTelegramId",
    to = "user::Column::TelegramId",
    on_delete = "Cascade"
  )]
  Referred,
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::ReferrerTelegramId",
    to = "user::Column::TelegramId",
    on_delete = "Cascade"
  )]
  Referrer,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Referred.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
