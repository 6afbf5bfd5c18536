use uuid::Uuid;

use crate::{
  entity::{SubscriptionStatus, subscription, user},
  model::Profile,
  prelude::*,
  screen::TrialUsage,
};

/// Panel-side state of a freshly provisioned subscription.
#[derive(Debug, Clone)]
pub struct Provisioned {
  pub user_remna_id: Uuid,
  pub status: SubscriptionStatus,
  pub is_trial: bool,
  pub traffic_limit: i32,
  pub device_limit: i32,
  pub expire_at: DateTime,
  pub url: String,
}

pub struct Subscription<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Subscription<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Stores the subscription and makes it the user's current one.
  pub async fn create(
    &self,
    telegram_id: i64,
    provisioned: Provisioned,
  ) -> Result<subscription::Model> {
    let txn = self.db.begin().await?;

    let user = user::Entity::find()
      .filter(user::Column::TelegramId.eq(telegram_id))
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    let now = Utc::now().naive_utc();
    let subscription = subscription::ActiveModel {
      id: NotSet,
      user_telegram_id: Set(telegram_id),
      user_remna_id: Set(provisioned.user_remna_id),
      status: Set(provisioned.status),
      is_trial: Set(provisioned.is_trial),
      traffic_limit: Set(provisioned.traffic_limit),
      device_limit: Set(provisioned.device_limit),
      expire_at: Set(provisioned.expire_at),
      url: Set(provisioned.url),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    user::ActiveModel {
      current_subscription_id: Set(Some(subscription.id)),
      updated_at: Set(now),
      ..user.into()
    }
    .update(&txn)
    .await?;

    txn.commit().await?;
    Ok(subscription)
  }

  /// Every subscription of the user, oldest first.
  pub async fn history(
    &self,
    telegram_id: i64,
  ) -> Result<Vec<subscription::Model>> {
    let subscriptions = subscription::Entity::find()
      .filter(subscription::Column::UserTelegramId.eq(telegram_id))
      .order_by_asc(subscription::Column::Id)
      .all(self.db)
      .await?;
    Ok(subscriptions)
  }

  pub async fn set_status(
    &self,
    id: i32,
    status: SubscriptionStatus,
  ) -> Result<subscription::Model> {
    let subscription = subscription::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or_else(|| Error::Internal(format!("Subscription {id} not found")))?;

    let subscription = subscription::ActiveModel {
      status: Set(status),
      updated_at: Set(Utc::now().naive_utc()),
      ..subscription.into()
    }
    .update(self.db)
    .await?;

    Ok(subscription)
  }
}

#[async_trait]
impl<'a> TrialUsage for Subscription<'a> {
  async fn has_used_trial(&self, profile: &Profile) -> Result<bool> {
    let trials = subscription::Entity::find()
      .filter(subscription::Column::UserTelegramId.eq(profile.telegram_id()))
      .filter(subscription::Column::IsTrial.eq(true))
      .count(self.db)
      .await?;
    Ok(trials > 0)
  }
}
