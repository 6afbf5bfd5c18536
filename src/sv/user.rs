use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

use crate::{
  entity::{Locale, UserRole, referral, subscription, user},
  model::Profile,
  prelude::*,
  screen::ReferralSource,
};

/// Deep-link payloads starting with this carry a referrer.
pub const REFERRAL_PREFIX: &str = "ref-";

const REFERRAL_CODE_ATTEMPTS: usize = 3;

fn referral_code() -> String {
  Uuid::new_v4().simple().to_string()[..10].to_string()
}

fn is_code_collision(err: &DbErr) -> bool {
  matches!(
    err.sql_err(),
    Some(SqlErr::UniqueConstraintViolation(message))
      if message.contains("referral_code")
  )
}

async fn find<C: ConnectionTrait>(
  conn: &C,
  telegram_id: i64,
) -> Result<Option<user::Model>> {
  let user = user::Entity::find()
    .filter(user::Column::TelegramId.eq(telegram_id))
    .one(conn)
    .await?;
  Ok(user)
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Returns the user and whether it was registered just now.
  pub async fn get_or_create(
    &self,
    telegram_id: i64,
    username: Option<&str>,
    name: &str,
    language: Locale,
  ) -> Result<(user::Model, bool)> {
    if let Some(user) = find(self.db, telegram_id).await? {
      return Ok((user, false));
    }

    let user =
      self.insert(telegram_id, username, name, language, referral_code).await?;
    info!("Registered user {} ({})", user.telegram_id, user.name);

    Ok((user, true))
  }

  /// Inserts a user, drawing a new referral code when one is already taken.
  async fn insert(
    &self,
    telegram_id: i64,
    username: Option<&str>,
    name: &str,
    language: Locale,
    mut codes: impl FnMut() -> String + Send,
  ) -> Result<user::Model> {
    let mut attempt = 1;

    loop {
      let now = Utc::now().naive_utc();
      let user = user::ActiveModel {
        id: NotSet,
        telegram_id: Set(telegram_id),
        username: Set(username.map(Into::into)),
        referral_code: Set(codes()),
        name: Set(name.into()),
        role: Set(UserRole::User),
        language: Set(language.clone()),
        personal_discount: Set(0),
        purchase_discount: Set(0),
        points: Set(0),
        is_blocked: Set(false),
        is_bot_blocked: Set(false),
        current_subscription_id: Set(None),
        referrer_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
      };

      match user.insert(self.db).await {
        Ok(user) => return Ok(user),
        Err(err)
          if attempt < REFERRAL_CODE_ATTEMPTS && is_code_collision(&err) =>
        {
          warn!("Referral code collision for {telegram_id}, attempt {attempt}");
          attempt += 1;
        }
        Err(err) => return Err(err.into()),
      }
    }
  }

  pub async fn by_telegram_id(
    &self,
    telegram_id: i64,
  ) -> Result<Option<user::Model>> {
    find(self.db, telegram_id).await
  }

  pub async fn by_referral_code(
    &self,
    code: &str,
  ) -> Result<Option<user::Model>> {
    let user = user::Entity::find()
      .filter(user::Column::ReferralCode.eq(code))
      .one(self.db)
      .await?;
    Ok(user)
  }

  /// Finds the inviting user of a `ref-<telegram id | referral code>` payload.
  pub async fn resolve_referrer(
    &self,
    payload: &str,
  ) -> Result<Option<user::Model>> {
    let Some(key) = payload.trim().strip_prefix(REFERRAL_PREFIX) else {
      return Ok(None);
    };

    if let Ok(telegram_id) = key.parse::<i64>()
      && let Some(user) = self.by_telegram_id(telegram_id).await?
    {
      return Ok(Some(user));
    }

    self.by_referral_code(key).await
  }

  /// Loads the user with its subscriptions and both sides of the referral
  /// relation.
  pub async fn profile(&self, telegram_id: i64) -> Result<Option<Profile>> {
    let Some(user) = find(self.db, telegram_id).await? else {
      return Ok(None);
    };

    let current_subscription = match user.current_subscription_id {
      Some(id) => subscription::Entity::find_by_id(id).one(self.db).await?,
      None => None,
    };

    let subscriptions =
      super::Subscription::new(self.db).history(telegram_id).await?;

    let referrer = match user.referrer_id {
      Some(referrer_id) => find(self.db, referrer_id).await?,
      None => None,
    };

    let referral = referral::Entity::find()
      .filter(referral::Column::ReferredTelegramId.eq(telegram_id))
      .one(self.db)
      .await?;

    let referrals = user::Entity::find()
      .filter(user::Column::ReferrerId.eq(telegram_id))
      .order_by_asc(user::Column::Id)
      .all(self.db)
      .await?;

    Ok(Some(Profile {
      user,
      current_subscription,
      subscriptions,
      referrer,
      referral,
      referrals,
    }))
  }

  /// Links `referred` under `referrer` and records the referral.
  pub async fn attach_referrer(
    &self,
    referred_id: i64,
    referrer_id: i64,
  ) -> Result<referral::Model> {
    if referred_id == referrer_id {
      return Err(Referral::SelfReferral.into());
    }

    let txn = self.db.begin().await?;

    let referred = find(&txn, referred_id).await?.ok_or(Error::UserNotFound)?;
    if referred.referrer_id.is_some() {
      return Err(Referral::AlreadyReferred.into());
    }

    // walk up from the new parent, reaching `referred` means a loop
    let mut ancestor = Some(referrer_id);
    while let Some(id) = ancestor {
      if id == referred_id {
        return Err(Referral::Cycle.into());
      }
      ancestor = find(&txn, id).await?.ok_or(Error::UserNotFound)?.referrer_id;
    }

    let now = Utc::now().naive_utc();

    user::ActiveModel {
      referrer_id: Set(Some(referrer_id)),
      updated_at: Set(now),
      ..referred.into()
    }
    .update(&txn)
    .await?;

    let referral = referral::ActiveModel {
      id: NotSet,
      referrer_telegram_id: Set(referrer_id),
      referred_telegram_id: Set(referred_id),
      created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!("User {referred_id} joined by invite of {referrer_id}");

    Ok(referral)
  }

  pub async fn set_bot_blocked(
    &self,
    telegram_id: i64,
    blocked: bool,
  ) -> Result<()> {
    let user = find(self.db, telegram_id).await?.ok_or(Error::UserNotFound)?;

    user::ActiveModel {
      is_bot_blocked: Set(blocked),
      updated_at: Set(Utc::now().naive_utc()),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  /// Points the user at one of their own subscriptions, or at none.
  pub async fn set_current_subscription(
    &self,
    telegram_id: i64,
    subscription_id: Option<i32>,
  ) -> Result<user::Model> {
    let user = find(self.db, telegram_id).await?.ok_or(Error::UserNotFound)?;

    if let Some(id) = subscription_id {
      let owned = subscription::Entity::find_by_id(id)
        .filter(subscription::Column::UserTelegramId.eq(telegram_id))
        .count(self.db)
        .await?;
      if owned == 0 {
        return Err(Error::Internal(format!(
          "Subscription {id} does not belong to user {telegram_id}"
        )));
      }
    }

    let user = user::ActiveModel {
      current_subscription_id: Set(subscription_id),
      updated_at: Set(Utc::now().naive_utc()),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok(user)
  }
}

#[async_trait]
impl<'a> ReferralSource for User<'a> {
  async fn referrals(&self, telegram_id: i64) -> Result<Profile> {
    self.profile(telegram_id).await?.ok_or(Error::UserNotFound)
  }
}
