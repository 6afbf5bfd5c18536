use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20251101_000005_create_payment_gateway_types::PaymentGatewayTypes;

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn position(
  manager: &SchemaManager<'_>,
  code: &str,
) -> Result<Option<i32>, DbErr> {
  let db = manager.get_connection();
  let select = Query::select()
    .column(PaymentGatewayTypes::Position)
    .from(PaymentGatewayTypes::Table)
    .and_where(Expr::col(PaymentGatewayTypes::Code).eq(code))
    .to_owned();

  match db.query_one(db.get_database_backend().build(&select)).await? {
    Some(row) => Ok(Some(row.try_get("", "position")?)),
    None => Ok(None),
  }
}

/// Moves every gateway placed after `anchor` one position down.
async fn shift_after(manager: &SchemaManager<'_>, anchor: i32) -> Result<(), DbErr> {
  let col = || Expr::col(PaymentGatewayTypes::Position);

  // negate first so the unique index never sees two equal positions
  manager
    .exec_stmt(
      Query::update()
        .table(PaymentGatewayTypes::Table)
        .value(PaymentGatewayTypes::Position, Expr::val(-1).sub(col()))
        .and_where(col().gt(anchor))
        .to_owned(),
    )
    .await?;
  manager
    .exec_stmt(
      Query::update()
        .table(PaymentGatewayTypes::Table)
        .value(PaymentGatewayTypes::Position, Expr::val(0).sub(col()))
        .and_where(col().lt(0))
        .to_owned(),
    )
    .await
}

/// Inserts `code` right behind `after`, keeping positions dense.
async fn insert_after(
  manager: &SchemaManager<'_>,
  code: &str,
  after: &str,
) -> Result<(), DbErr> {
  if position(manager, code).await?.is_some() {
    return Err(DbErr::Migration(format!("Gateway `{code}` already exists")));
  }
  let Some(anchor) = position(manager, after).await? else {
    return Err(DbErr::Migration(format!(
      "Gateway `{after}` is missing, cannot place `{code}`"
    )));
  };

  shift_after(manager, anchor).await?;
  manager
    .exec_stmt(
      Query::insert()
        .into_table(PaymentGatewayTypes::Table)
        .columns([PaymentGatewayTypes::Code, PaymentGatewayTypes::Position])
        .values_panic([code.into(), (anchor + 1).into()])
        .to_owned(),
    )
    .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // order matters: ROBOKASSA is placed relative to CRYPTOPAY
    insert_after(manager, "CRYPTOPAY", "HELEKET").await?;
    insert_after(manager, "ROBOKASSA", "CRYPTOPAY").await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // fails while transactions still reference these gateways
    manager
      .exec_stmt(
        Query::delete()
          .from_table(PaymentGatewayTypes::Table)
          .and_where(
            Expr::col(PaymentGatewayTypes::Code).is_in(["CRYPTOPAY", "ROBOKASSA"]),
          )
          .to_owned(),
      )
      .await
  }
}

#[cfg(test)]
mod tests {
  use sea_orm_migration::sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement,
  };

  use super::*;
  use crate::Migrator;

  async fn gateways(db: &DatabaseConnection) -> Vec<(String, i32)> {
    let rows = db
      .query_all(Statement::from_string(
        DbBackend::Sqlite,
        "SELECT code, position FROM payment_gateway_types ORDER BY position",
      ))
      .await
      .unwrap();

    rows
      .into_iter()
      .map(|row| {
        (row.try_get("", "code").unwrap(), row.try_get("", "position").unwrap())
      })
      .collect()
  }

  #[tokio::test]
  async fn test_appends_after_heleket() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let codes: Vec<_> =
      gateways(&db).await.into_iter().map(|(code, _)| code).collect();

    assert_eq!(
      codes,
      [
        "TELEGRAM_STARS",
        "YOOKASSA",
        "YOOMONEY",
        "CRYPTOMUS",
        "HELEKET",
        "CRYPTOPAY",
        "ROBOKASSA"
      ]
    );
  }

  #[tokio::test]
  async fn test_second_upgrade_is_rejected() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    assert!(Migration.up(&manager).await.is_err());

    // nothing was duplicated or moved by the failed attempt
    let rows = gateways(&db).await;
    assert_eq!(rows.len(), 7);
    assert_eq!(rows.last().unwrap(), &("ROBOKASSA".to_string(), 7));
  }

  async fn exec(db: &DatabaseConnection, sql: &str) {
    db.execute(Statement::from_string(DbBackend::Sqlite, sql)).await.unwrap();
  }

  #[tokio::test]
  async fn test_missing_anchor_fails() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, Some(5)).await.unwrap();
    exec(&db, "DELETE FROM payment_gateway_types WHERE code = 'HELEKET'").await;

    let manager = SchemaManager::new(&db);
    let err = Migration.up(&manager).await.unwrap_err();

    assert!(matches!(err, DbErr::Migration(_)));
    assert_eq!(gateways(&db).await.len(), 4);
  }

  #[tokio::test]
  async fn test_shifts_gateways_behind_anchor() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, Some(5)).await.unwrap();
    // HELEKET sits before CRYPTOMUS now
    for (code, position) in [("CRYPTOMUS", 10), ("HELEKET", 4), ("CRYPTOMUS", 5)] {
      exec(
        &db,
        &format!(
          "UPDATE payment_gateway_types SET position = {position} WHERE code = '{code}'"
        ),
      )
      .await;
    }

    let manager = SchemaManager::new(&db);
    Migration.up(&manager).await.unwrap();

    assert_eq!(
      gateways(&db).await,
      [
        ("TELEGRAM_STARS".to_string(), 1),
        ("YOOKASSA".to_string(), 2),
        ("YOOMONEY".to_string(), 3),
        ("HELEKET".to_string(), 4),
        ("CRYPTOPAY".to_string(), 5),
        ("ROBOKASSA".to_string(), 6),
        ("CRYPTOMUS".to_string(), 7),
      ]
    );
  }

  #[tokio::test]
  async fn test_downgrade_removes_values() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Migrator::down(&db, Some(1)).await.unwrap();

    let rows = gateways(&db).await;
    assert_eq!(rows.len(), 5);
    assert_eq!(rows.last().unwrap(), &("HELEKET".to_string(), 5));
  }
}
