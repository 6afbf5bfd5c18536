use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Who a plan is offered to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PlanAvailability {
  #[sea_orm(string_value = "ALL")]
  #[default]
  All,
  #[sea_orm(string_value = "INVITED")]
  Invited,
  /// Free plan, one use per user
  #[sea_orm(string_value = "TRIAL")]
  Trial,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
  pub availability: PlanAvailability,
  pub traffic_limit: i32,
  pub device_limit: i32,
  pub duration_days: i32,
  pub is_active: bool,
  pub order_index: i32,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
