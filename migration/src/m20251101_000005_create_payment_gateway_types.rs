use sea_orm_migration::prelude::*;

/// Gateways known before the lookup table existed, in display order.
const INITIAL: [&str; 5] =
  ["TELEGRAM_STARS", "YOOKASSA", "YOOMONEY", "CRYPTOMUS", "HELEKET"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(PaymentGatewayTypes::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(PaymentGatewayTypes::Code)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(
            ColumnDef::new(PaymentGatewayTypes::Position)
              .integer()
              .not_null()
              .unique_key(),
          )
          .to_owned(),
      )
      .await?;

    let mut insert = Query::insert();
    insert
      .into_table(PaymentGatewayTypes::Table)
      .columns([PaymentGatewayTypes::Code, PaymentGatewayTypes::Position]);

    for (position, code) in INITIAL.into_iter().enumerate() {
      insert.values_panic([code.into(), (position as i32 + 1).into()]);
    }

    manager.exec_stmt(insert).await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(PaymentGatewayTypes::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum PaymentGatewayTypes {
  Table,
  Code,
  Position,
}
