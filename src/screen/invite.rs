use serde::Serialize;

use super::{BotIdentity, ReferralSource, TransactionLookup};
use crate::{entity::TransactionStatus, model::Profile, prelude::*};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invite {
  pub referral_count: usize,
  pub referral_payments: usize,
  pub referral_earned: i32,
  pub referral_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvitedUsers {
  pub invited_users: String,
  pub invited_user_count: usize,
}

/// The discount shown as earned is the larger of the two, never their sum.
pub fn referral_earned(personal_discount: i32, purchase_discount: i32) -> i32 {
  personal_discount.max(purchase_discount)
}

/// Referral statistics of `profile`.
///
/// Referrals are reloaded through `users`; the caller's copy may be stale.
pub async fn invite(
  profile: &Profile,
  users: &impl ReferralSource,
  transactions: &impl TransactionLookup,
  bot: &impl BotIdentity,
) -> Result<Invite> {
  debug!(
    "User {} has {} cached referrals",
    profile.telegram_id(),
    profile.referrals.len()
  );
  let fresh = users.referrals(profile.telegram_id()).await?;
  debug!(
    "User {} has {} referrals after reload",
    fresh.telegram_id(),
    fresh.referrals.len()
  );

  let payments = transactions
    .by_referrer_and_status(&fresh.referrals, TransactionStatus::Completed)
    .await?;
  let bot_username = bot.bot_username().await?;

  Ok(Invite {
    referral_count: fresh.referrals.len(),
    referral_payments: payments.len(),
    referral_earned: referral_earned(
      fresh.user.personal_discount,
      fresh.user.purchase_discount,
    ),
    referral_link: utils::referral_link(&bot_username, fresh.telegram_id()),
  })
}

/// Names of the invited users as a bulleted list.
pub async fn invited_users(
  profile: &Profile,
  users: &impl ReferralSource,
) -> Result<InvitedUsers> {
  let fresh = users.referrals(profile.telegram_id()).await?;

  Ok(InvitedUsers {
    invited_users: utils::bullet_list(
      fresh.referrals.iter().map(|user| user.name.as_str()),
    ),
    invited_user_count: fresh.referrals.len(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::screen::mock;

  fn with_referrals(names: &[&str]) -> Profile {
    let mut profile = mock::profile(mock::user(12345, "Owner"));
    profile.referrals = names
      .iter()
      .enumerate()
      .map(|(i, name)| mock::user(100 + i as i64, name))
      .collect();
    profile
  }

  #[test]
  fn test_earned_is_max_not_sum() {
    for (personal, purchase) in [(0, 0), (5, 0), (0, 7), (10, 15), (20, 3)] {
      assert_eq!(referral_earned(personal, purchase), personal.max(purchase));
    }
    assert_ne!(referral_earned(10, 15), 25);
  }

  #[tokio::test]
  async fn test_invite_uses_fresh_referrals() {
    // cached copy knows nothing about the invites
    let stale = with_referrals(&[]);

    let mut fresh = with_referrals(&["Alice", "Bob", "Carol"]);
    fresh.user.personal_discount = 10;
    fresh.user.purchase_discount = 15;

    let mut refunded = mock::transaction(101);
    refunded.status = TransactionStatus::Refunded;
    let ledger = mock::Ledger(vec![
      mock::transaction(100),
      mock::transaction(101),
      refunded,
      // not a referral of this user
      mock::transaction(999),
    ]);

    let screen = invite(
      &stale,
      &mock::Fresh(fresh),
      &ledger,
      &mock::Bot("ExampleBot"),
    )
    .await
    .unwrap();

    assert_eq!(screen.referral_count, 3);
    assert_eq!(screen.referral_payments, 2);
    assert_eq!(screen.referral_earned, 15);
    assert_eq!(screen.referral_link, "https://t.me/ExampleBot?start=ref-12345");
  }

  #[tokio::test]
  async fn test_invite_propagates_lookup_failure() {
    let profile = with_referrals(&[]);
    let other = mock::profile(mock::user(1, "Someone else"));

    let result = invite(
      &profile,
      &mock::Fresh(other),
      &mock::Ledger::default(),
      &mock::Bot("ExampleBot"),
    )
    .await;

    assert!(matches!(result, Err(Error::UserNotFound)));
  }

  #[tokio::test]
  async fn test_invited_users_list() {
    let profile = with_referrals(&[]);

    let screen = invited_users(
      &profile,
      &mock::Fresh(with_referrals(&["Alice", "Bob"])),
    )
    .await
    .unwrap();

    assert_eq!(screen.invited_users, "• Alice\n• Bob");
    assert_eq!(screen.invited_user_count, 2);
  }

  #[tokio::test]
  async fn test_no_invited_users_keeps_marker() {
    let profile = with_referrals(&[]);

    let screen =
      invited_users(&profile, &mock::Fresh(profile.clone())).await.unwrap();

    assert_eq!(screen.invited_users, "• ");
    assert_eq!(screen.invited_user_count, 0);
  }
}
