use sea_orm_migration::prelude::*;

use super::m20251101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Subscriptions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Subscriptions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Subscriptions::UserTelegramId)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(Subscriptions::UserRemnaId).uuid().not_null())
          .col(ColumnDef::new(Subscriptions::Status).string().not_null())
          .col(
            ColumnDef::new(Subscriptions::IsTrial)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(Subscriptions::TrafficLimit)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Subscriptions::DeviceLimit)
              .integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Subscriptions::ExpireAt).date_time().not_null())
          .col(ColumnDef::new(Subscriptions::Url).string().not_null())
          .col(ColumnDef::new(Subscriptions::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Subscriptions::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_subscriptions_user")
              .from(Subscriptions::Table, Subscriptions::UserTelegramId)
              .to(Users::Table, Users::TelegramId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_subscriptions_user")
          .table(Subscriptions::Table)
          .col(Subscriptions::UserTelegramId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Subscriptions {
  Table,
  Id,
  UserTelegramId,
  UserRemnaId,
  Status,
  IsTrial,
  TrafficLimit,
  DeviceLimit,
  ExpireAt,
  Url,
  CreatedAt,
  UpdatedAt,
}
