use sea_orm_migration::prelude::*;

use super::m20251101_000002_create_subscriptions::Subscriptions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Users::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Users::TelegramId).big_integer().not_null().unique_key(),
          )
          .col(ColumnDef::new(Users::Username).string().null())
          .col(ColumnDef::new(Users::ReferralCode).string().not_null().unique_key())
          .col(ColumnDef::new(Users::Name).string().not_null())
          .col(ColumnDef::new(Users::Role).string().not_null().default("USER"))
          .col(ColumnDef::new(Users::Language).string().not_null().default("en"))
          .col(
            ColumnDef::new(Users::PersonalDiscount)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Users::PurchaseDiscount)
              .integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Users::Points).integer().not_null().default(0))
          .col(ColumnDef::new(Users::IsBlocked).boolean().not_null().default(false))
          .col(
            ColumnDef::new(Users::IsBotBlocked).boolean().not_null().default(false),
          )
          .col(ColumnDef::new(Users::CurrentSubscriptionId).integer().null())
          .col(ColumnDef::new(Users::ReferrerId).big_integer().null())
          .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
          .check(Expr::col(Users::Role).is_in(["DEV", "ADMIN", "USER"]))
          .check(Expr::col(Users::Language).is_in(["en", "ru", "uk"]))
          // a user can never be its own referrer
          .check(Expr::col(Users::ReferrerId).ne(Expr::col(Users::TelegramId)))
          .foreign_key(
            ForeignKey::create()
              .name("fk_users_current_subscription")
              .from(Users::Table, Users::CurrentSubscriptionId)
              .to(Subscriptions::Table, Subscriptions::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_users_referrer")
              .from(Users::Table, Users::ReferrerId)
              .to(Users::Table, Users::TelegramId)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_users_referrer")
          .table(Users::Table)
          .col(Users::ReferrerId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  Id,
  TelegramId,
  Username,
  ReferralCode,
  Name,
  Role,
  Language,
  PersonalDiscount,
  PurchaseDiscount,
  Points,
  IsBlocked,
  IsBotBlocked,
  CurrentSubscriptionId,
  ReferrerId,
  CreatedAt,
  UpdatedAt,
}
