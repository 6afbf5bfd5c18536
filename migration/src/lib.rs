pub use sea_orm_migration::prelude::*;

mod m20251101_000001_create_users;
mod m20251101_000002_create_subscriptions;
mod m20251101_000003_create_plans;
mod m20251101_000004_create_referrals;
mod m20251101_000005_create_payment_gateway_types;
mod m20251101_000006_create_transactions;
mod m20251122_000007_add_cryptopay_robokassa;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20251101_000001_create_users::Migration),
      Box::new(m20251101_000002_create_subscriptions::Migration),
      Box::new(m20251101_000003_create_plans::Migration),
      Box::new(m20251101_000004_create_referrals::Migration),
      Box::new(m20251101_000005_create_payment_gateway_types::Migration),
      Box::new(m20251101_000006_create_transactions::Migration),
      Box::new(m20251122_000007_add_cryptopay_robokassa::Migration),
    ]
  }
}
