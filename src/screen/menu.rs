use serde::Serialize;

use super::{PlanLookup, TrialUsage};
use crate::{
  entity::{PlanType, SubscriptionStatus},
  model::Profile,
  prelude::*,
  state::Config,
};

/// Prefilled text of the support chat link.
const SUPPORT_TEXT: &str = "Hello! I need help with my subscription.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
  pub user_id: String,
  pub user_name: String,
  pub personal_discount: i32,
  pub support: String,
  pub has_subscription: bool,
  pub miniapp_url: String,
  pub status: Option<SubscriptionStatus>,
  pub is_trial: bool,
  pub trial_available: bool,
  pub has_device_limit: bool,
  pub connectable: bool,
  #[serde(flatten)]
  pub subscription: Option<SubscriptionSummary>,
}

/// Keys present only while the user has a current subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionSummary {
  #[serde(rename = "type")]
  pub plan_type: PlanType,
  pub traffic_limit: String,
  pub device_limit: String,
  pub expire_time: String,
  pub subscription_url: String,
}

pub async fn menu(
  config: &Config,
  profile: &Profile,
  plans: &impl PlanLookup,
  trials: &impl TrialUsage,
) -> Result<Menu> {
  let plan = plans.trial_plan().await?;
  let has_used_trial = trials.has_used_trial(profile).await?;
  let support = utils::username_url(&config.support_username, SUPPORT_TEXT)?;

  let user = &profile.user;
  let mut menu = Menu {
    user_id: user.telegram_id.to_string(),
    user_name: user.name.clone(),
    personal_discount: user.personal_discount,
    support: support.into(),
    has_subscription: profile.has_subscription(),
    miniapp_url: config.mini_app_url.clone(),
    status: None,
    is_trial: false,
    trial_available: !has_used_trial && plan.is_some(),
    has_device_limit: false,
    connectable: false,
    subscription: None,
  };

  let Some(subscription) = &profile.current_subscription else {
    return Ok(menu);
  };

  let now = Utc::now().naive_utc();
  let is_active = subscription.is_active();

  menu.status = Some(subscription.status);
  menu.is_trial = subscription.is_trial;
  menu.trial_available = false;
  // an inactive subscription has nothing to limit
  menu.has_device_limit = is_active && subscription.has_devices_limit();
  menu.connectable = is_active;
  menu.subscription = Some(SubscriptionSummary {
    plan_type: subscription.plan_type(),
    traffic_limit: utils::format_traffic_limit(subscription.traffic_limit),
    device_limit: utils::format_device_limit(subscription.device_limit),
    expire_time: utils::format_expire_time(subscription.expire_at, now),
    subscription_url: subscription.url.clone(),
  });

  Ok(menu)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    entity::{PlanAvailability, plan},
    screen::{data, mock},
  };

  fn config() -> Config {
    Config {
      support_username: "shop_support".into(),
      mini_app_url: "https://app.example".into(),
      ..Config::default()
    }
  }

  fn trial_plan() -> plan::Model {
    plan::Model {
      id: 1,
      name: "Trial".into(),
      availability: PlanAvailability::Trial,
      traffic_limit: 10,
      device_limit: 1,
      duration_days: 3,
      is_active: true,
      order_index: 0,
      created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap(),
    }
  }

  fn subscribed(status: SubscriptionStatus, device_limit: i32) -> Profile {
    let mut profile = mock::profile(mock::user(12345, "Alice"));
    profile.current_subscription =
      Some(mock::subscription(12345, status, device_limit));
    profile
  }

  #[tokio::test]
  async fn test_without_subscription() {
    let profile = mock::profile(mock::user(12345, "Alice"));

    let plans = mock::Plans(Some(trial_plan()));
    let menu =
      menu(&config(), &profile, &plans, &mock::Trials(false)).await.unwrap();

    assert_eq!(menu.user_id, "12345");
    assert_eq!(menu.user_name, "Alice");
    assert!(!menu.has_subscription);
    assert_eq!(menu.status, None);
    assert!(!menu.is_trial);
    assert!(menu.trial_available);
    assert!(!menu.has_device_limit);
    assert!(!menu.connectable);
    assert!(menu.subscription.is_none());
    assert!(menu.support.starts_with("https://t.me/shop_support?text="));

    let data = data(&menu).unwrap();
    assert_eq!(data["status"], json::Value::Null);
    assert!(!data.contains_key("type"));
    assert!(!data.contains_key("subscription_url"));
  }

  #[tokio::test]
  async fn test_trial_availability() {
    let profile = mock::profile(mock::user(1, "Bob"));

    for (plan, used, expected) in [
      (Some(trial_plan()), false, true),
      (Some(trial_plan()), true, false),
      (None, false, false),
      (None, true, false),
    ] {
      let plans = mock::Plans(plan);
      let menu =
        menu(&config(), &profile, &plans, &mock::Trials(used)).await.unwrap();
      assert_eq!(menu.trial_available, expected);
    }
  }

  #[tokio::test]
  async fn test_active_subscription() {
    let profile = subscribed(SubscriptionStatus::Active, 3);

    let menu = menu(&config(), &profile, &mock::Plans(None), &mock::Trials(true))
      .await
      .unwrap();

    assert!(menu.has_subscription);
    assert_eq!(menu.status, Some(SubscriptionStatus::Active));
    assert!(menu.has_device_limit);
    assert!(menu.connectable);

    let summary = menu.subscription.as_ref().unwrap();
    assert_eq!(summary.plan_type, PlanType::Both);
    assert_eq!(summary.traffic_limit, "50 GB");
    assert_eq!(summary.device_limit, "3");
    assert_eq!(summary.subscription_url, "https://panel.example/sub/xyz");

    let data = data(&menu).unwrap();
    assert_eq!(data["type"], "BOTH");
    assert_eq!(data["status"], "ACTIVE");
    assert_eq!(data["connectable"], true);
  }

  #[tokio::test]
  async fn test_inactive_subscription_hides_device_limit() {
    let profile = subscribed(SubscriptionStatus::Disabled, 3);

    let menu = menu(&config(), &profile, &mock::Plans(None), &mock::Trials(true))
      .await
      .unwrap();

    assert_eq!(menu.status, Some(SubscriptionStatus::Disabled));
    assert!(!menu.has_device_limit);
    assert!(!menu.connectable);
    assert!(menu.subscription.is_some());
  }

  #[tokio::test]
  async fn test_unlimited_devices() {
    let profile = subscribed(SubscriptionStatus::Active, 0);

    let menu = menu(&config(), &profile, &mock::Plans(None), &mock::Trials(false))
      .await
      .unwrap();

    assert!(!menu.has_device_limit);
    assert_eq!(menu.subscription.unwrap().device_limit, utils::UNLIMITED);
  }
}
