//! View-models for the bot screens.
//!
//! Every aggregator receives a fully loaded [`Profile`] plus the collaborators
//! it needs, and never reaches storage on its own. The resulting structs turn
//! into flat key-value maps with [`data`] for the renderer.

mod devices;
mod invite;
mod menu;

use json::{Map, Value};
use serde::Serialize;

pub use self::{
  devices::{Devices, devices},
  invite::{Invite, InvitedUsers, invite, invited_users},
  menu::{Menu, SubscriptionSummary, menu},
};
use crate::{
  entity::{TransactionStatus, plan, transaction, user},
  model::Profile,
  prelude::*,
  remnawave::Device,
};

#[async_trait]
pub trait PlanLookup: Send + Sync {
  async fn trial_plan(&self) -> Result<Option<plan::Model>>;
}

#[async_trait]
pub trait TrialUsage: Send + Sync {
  async fn has_used_trial(&self, profile: &Profile) -> Result<bool>;
}

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
  async fn devices(&self, profile: &Profile) -> Result<Vec<Device>>;
}

/// Reloads a user so that `referrals` reflects the current state.
#[async_trait]
pub trait ReferralSource: Send + Sync {
  async fn referrals(&self, telegram_id: i64) -> Result<Profile>;
}

#[async_trait]
pub trait TransactionLookup: Send + Sync {
  async fn by_referrer_and_status(
    &self,
    referrals: &[user::Model],
    status: TransactionStatus,
  ) -> Result<Vec<transaction::Model>>;
}

#[async_trait]
pub trait BotIdentity: Send + Sync {
  async fn bot_username(&self) -> Result<String>;
}

/// Flattens a screen into the key-value map consumed by templates.
pub fn data(screen: &impl Serialize) -> Result<Map<String, Value>> {
  match json::to_value(screen)? {
    Value::Object(map) => Ok(map),
    other => Err(Error::Internal(format!("Screen is not a map: {other}"))),
  }
}

#[cfg(test)]
pub(crate) mod mock {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use chrono::NaiveDate;
  use uuid::Uuid;

  use super::*;
  use crate::entity::{Locale, PaymentGatewayType, SubscriptionStatus, UserRole, subscription};

  pub fn user(telegram_id: i64, name: &str) -> user::Model {
    let at = NaiveDate::from_ymd_opt(2025, 11, 1)
      .unwrap()
      .and_hms_opt(12, 0, 0)
      .unwrap();

    user::Model {
      id: telegram_id as i32,
      telegram_id,
      username: None,
      referral_code: format!("code{telegram_id}"),
      name: name.into(),
      role: UserRole::User,
      language: Locale::En,
      personal_discount: 0,
      purchase_discount: 0,
      points: 0,
      is_blocked: false,
      is_bot_blocked: false,
      current_subscription_id: None,
      referrer_id: None,
      created_at: at,
      updated_at: at,
    }
  }

  pub fn subscription(
    telegram_id: i64,
    status: SubscriptionStatus,
    device_limit: i32,
  ) -> subscription::Model {
    let now = Utc::now().naive_utc();

    subscription::Model {
      id: 1,
      user_telegram_id: telegram_id,
      user_remna_id: Uuid::nil(),
      status,
      is_trial: false,
      traffic_limit: 50,
      device_limit,
      expire_at: now + TimeDelta::days(10),
      url: "https://panel.example/sub/xyz".into(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn profile(user: user::Model) -> Profile {
    Profile {
      user,
      current_subscription: None,
      subscriptions: Vec::new(),
      referrer: None,
      referral: None,
      referrals: Vec::new(),
    }
  }

  pub fn transaction(telegram_id: i64) -> transaction::Model {
    let now = Utc::now().naive_utc();

    transaction::Model {
      id: 1,
      payment_id: Uuid::new_v4(),
      user_telegram_id: telegram_id,
      status: TransactionStatus::Completed,
      gateway_type: PaymentGatewayType::TelegramStars,
      amount: 100,
      currency: "XTR".into(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Counts calls so tests can assert a collaborator was never reached.
  #[derive(Default)]
  pub struct Calls(AtomicUsize);

  impl Calls {
    pub fn hit(&self) {
      self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
      self.0.load(Ordering::SeqCst)
    }
  }

  pub struct Plans(pub Option<plan::Model>);

  #[async_trait]
  impl PlanLookup for Plans {
    async fn trial_plan(&self) -> Result<Option<plan::Model>> {
      Ok(self.0.clone())
    }
  }

  pub struct Trials(pub bool);

  #[async_trait]
  impl TrialUsage for Trials {
    async fn has_used_trial(&self, _: &Profile) -> Result<bool> {
      Ok(self.0)
    }
  }

  #[derive(Default)]
  pub struct Registry {
    pub devices: Vec<Device>,
    pub calls: Calls,
  }

  #[async_trait]
  impl DeviceRegistry for Registry {
    async fn devices(&self, _: &Profile) -> Result<Vec<Device>> {
      self.calls.hit();
      Ok(self.devices.clone())
    }
  }

  /// Serves a stored profile regardless of what the caller holds.
  pub struct Fresh(pub Profile);

  #[async_trait]
  impl ReferralSource for Fresh {
    async fn referrals(&self, telegram_id: i64) -> Result<Profile> {
      if telegram_id == self.0.telegram_id() {
        Ok(self.0.clone())
      } else {
        Err(Error::UserNotFound)
      }
    }
  }

  #[derive(Default)]
  pub struct Ledger(pub Vec<transaction::Model>);

  #[async_trait]
  impl TransactionLookup for Ledger {
    async fn by_referrer_and_status(
      &self,
      referrals: &[user::Model],
      status: TransactionStatus,
    ) -> Result<Vec<transaction::Model>> {
      Ok(
        self
          .0
          .iter()
          .filter(|tx| tx.status == status)
          .filter(|tx| referrals.iter().any(|u| u.telegram_id == tx.user_telegram_id))
          .cloned()
          .collect(),
      )
    }
  }

  pub struct Bot(pub &'static str);

  #[async_trait]
  impl BotIdentity for Bot {
    async fn bot_username(&self) -> Result<String> {
      Ok(self.0.into())
    }
  }
}
