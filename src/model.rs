use serde::Serialize;

use crate::entity::{referral, subscription, user};

/// A user together with every relation the screens read.
///
/// Built by `sv::User::profile`, which loads all relations up front; nothing
/// here is fetched lazily.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
  pub user: user::Model,
  pub current_subscription: Option<subscription::Model>,
  /// Every subscription the user ever owned
  pub subscriptions: Vec<subscription::Model>,
  pub referrer: Option<user::Model>,
  pub referral: Option<referral::Model>,
  /// Users invited by this one, one level deep
  pub referrals: Vec<user::Model>,
}

impl Profile {
  pub fn telegram_id(&self) -> i64 {
    self.user.telegram_id
  }

  pub fn has_subscription(&self) -> bool {
    self.current_subscription.is_some()
  }
}
