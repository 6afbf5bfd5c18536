use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{PaymentGatewayType, user};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TransactionStatus {
  #[sea_orm(string_value = "PENDING")]
  #[default]
  Pending,
  #[sea_orm(string_value = "COMPLETED")]
  Completed,
  #[sea_orm(string_value = "CANCELED")]
  Canceled,
  #[sea_orm(string_value = "REFUNDED")]
  Refunded,
  #[sea_orm(string_value = "FAILED")]
  Failed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub payment_id: Uuid,
  pub user_telegram_id: i64,
  pub status: TransactionStatus,
  pub gateway_type: PaymentGatewayType,
  /// Amount in minor currency units
  pub amount: i64,
  pub currency: String,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::UserTelegramId",
    to = "user::Column::TelegramId",
    on_delete = "Cascade"
  )]
  User,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
