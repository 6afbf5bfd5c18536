use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

/// Subscription state as reported by the VPN panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
  #[sea_orm(string_value = "ACTIVE")]
  Active,
  #[sea_orm(string_value = "DISABLED")]
  Disabled,
  #[sea_orm(string_value = "LIMITED")]
  Limited,
  #[sea_orm(string_value = "EXPIRED")]
  Expired,
  #[sea_orm(string_value = "DELETED")]
  Deleted,
}

/// Which limits a subscription is constrained by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
  Traffic,
  Devices,
  Both,
  Unlimited,
}

impl PlanType {
  /// Limits of `0` mean "unlimited".
  pub fn classify(traffic_limit: i32, device_limit: i32) -> Self {
    match (traffic_limit > 0, device_limit > 0) {
      (true, true) => Self::Both,
      (true, false) => Self::Traffic,
      (false, true) => Self::Devices,
      (false, false) => Self::Unlimited,
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub user_telegram_id: i64,
  /// Id of the matching user in the VPN panel
  pub user_remna_id: Uuid,
  pub status: SubscriptionStatus,
  pub is_trial: bool,
  /// Traffic cap in GB, `0` for unlimited
  pub traffic_limit: i32,
  /// Device cap, `0` for unlimited
  pub device_limit: i32,
  pub expire_at: DateTime,
  /// Connection string handed out to clients
  pub url: String,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

impl Model {
  pub fn is_active(&self) -> bool {
    self.status == SubscriptionStatus::Active
  }

  pub fn has_devices_limit(&self) -> bool {
    self.device_limit > 0
  }

  pub fn plan_type(&self) -> PlanType {
    PlanType::classify(self.traffic_limit, self.device_limit)
  }
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plan_type_classification() {
    assert_eq!(PlanType::classify(100, 3), PlanType::Both);
    assert_eq!(PlanType::classify(100, 0), PlanType::Traffic);
    assert_eq!(PlanType::classify(0, 3), PlanType::Devices);
    assert_eq!(PlanType::classify(0, 0), PlanType::Unlimited);
  }
}
