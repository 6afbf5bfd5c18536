use uuid::Uuid;

use crate::{
  entity::{PaymentGatewayType, TransactionStatus, payment_gateway, transaction, user},
  prelude::*,
  screen::TransactionLookup,
};

pub struct Transaction<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Transaction<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    telegram_id: i64,
    gateway: PaymentGatewayType,
    amount: i64,
    currency: &str,
  ) -> Result<transaction::Model> {
    let now = Utc::now().naive_utc();

    let transaction = transaction::ActiveModel {
      id: NotSet,
      payment_id: Set(Uuid::new_v4()),
      user_telegram_id: Set(telegram_id),
      status: Set(TransactionStatus::Pending),
      gateway_type: Set(gateway),
      amount: Set(amount),
      currency: Set(currency.into()),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(transaction.insert(self.db).await?)
  }

  pub async fn set_status(
    &self,
    payment_id: Uuid,
    status: TransactionStatus,
  ) -> Result<transaction::Model> {
    let transaction = transaction::Entity::find()
      .filter(transaction::Column::PaymentId.eq(payment_id))
      .one(self.db)
      .await?
      .ok_or(Error::TransactionNotFound)?;

    let transaction = transaction::ActiveModel {
      status: Set(status),
      updated_at: Set(Utc::now().naive_utc()),
      ..transaction.into()
    }
    .update(self.db)
    .await?;

    Ok(transaction)
  }

  /// Transactions made by any of `referrals` in the given status.
  pub async fn by_referrer_and_status(
    &self,
    referrals: &[user::Model],
    status: TransactionStatus,
  ) -> Result<Vec<transaction::Model>> {
    if referrals.is_empty() {
      return Ok(Vec::new());
    }

    let transactions = transaction::Entity::find()
      .filter(
        transaction::Column::UserTelegramId
          .is_in(referrals.iter().map(|user| user.telegram_id)),
      )
      .filter(transaction::Column::Status.eq(status))
      .order_by_asc(transaction::Column::Id)
      .all(self.db)
      .await?;
    Ok(transactions)
  }

  /// Gateways known to the database, in display order.
  pub async fn gateways(&self) -> Result<Vec<payment_gateway::Model>> {
    let gateways = payment_gateway::Entity::find()
      .order_by_asc(payment_gateway::Column::Position)
      .all(self.db)
      .await?;
    Ok(gateways)
  }
}

#[async_trait]
impl<'a> TransactionLookup for Transaction<'a> {
  async fn by_referrer_and_status(
    &self,
    referrals: &[user::Model],
    status: TransactionStatus,
  ) -> Result<Vec<transaction::Model>> {
    Transaction::by_referrer_and_status(self, referrals, status).await
  }
}
