use sea_orm_migration::prelude::*;

use super::{
  m20251101_000001_create_users::Users,
  m20251101_000005_create_payment_gateway_types::PaymentGatewayTypes,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Transactions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Transactions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Transactions::PaymentId).uuid().not_null().unique_key(),
          )
          .col(
            ColumnDef::new(Transactions::UserTelegramId).big_integer().not_null(),
          )
          .col(
            ColumnDef::new(Transactions::Status)
              .string()
              .not_null()
              .default("PENDING"),
          )
          .col(ColumnDef::new(Transactions::GatewayType).string().not_null())
          .col(ColumnDef::new(Transactions::Amount).big_integer().not_null())
          .col(ColumnDef::new(Transactions::Currency).string().not_null())
          .col(ColumnDef::new(Transactions::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Transactions::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_transactions_user")
              .from(Transactions::Table, Transactions::UserTelegramId)
              .to(Users::Table, Users::TelegramId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_transactions_gateway")
              .from(Transactions::Table, Transactions::GatewayType)
              .to(PaymentGatewayTypes::Table, PaymentGatewayTypes::Code)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_transactions_user_status")
          .table(Transactions::Table)
          .col(Transactions::UserTelegramId)
          .col(Transactions::Status)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Transactions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Transactions {
  Table,
  Id,
  PaymentId,
  UserTelegramId,
  Status,
  GatewayType,
  Amount,
  Currency,
  CreatedAt,
  UpdatedAt,
}
