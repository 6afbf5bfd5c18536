use crate::{
  entity::{PlanAvailability, plan},
  prelude::*,
  screen::PlanLookup,
};

pub struct Plan<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Plan<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// The first active plan offered as a free trial.
  pub async fn trial(&self) -> Result<Option<plan::Model>> {
    let plan = plan::Entity::find()
      .filter(plan::Column::Availability.eq(PlanAvailability::Trial))
      .filter(plan::Column::IsActive.eq(true))
      .order_by_asc(plan::Column::OrderIndex)
      .one(self.db)
      .await?;
    Ok(plan)
  }
}

#[async_trait]
impl<'a> PlanLookup for Plan<'a> {
  async fn trial_plan(&self) -> Result<Option<plan::Model>> {
    self.trial().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::testing;

  pub async fn insert_plan(
    db: &DatabaseConnection,
    name: &str,
    availability: PlanAvailability,
    is_active: bool,
    order_index: i32,
  ) -> plan::Model {
    plan::ActiveModel {
      id: NotSet,
      name: Set(name.into()),
      availability: Set(availability),
      traffic_limit: Set(10),
      device_limit: Set(1),
      duration_days: Set(3),
      is_active: Set(is_active),
      order_index: Set(order_index),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap()
  }

  #[tokio::test]
  async fn test_trial_plan() {
    let db = testing::db().await;
    let sv = Plan::new(&db);

    assert!(sv.trial().await.unwrap().is_none());

    insert_plan(&db, "Month", PlanAvailability::All, true, 0).await;
    insert_plan(&db, "Old trial", PlanAvailability::Trial, false, 0).await;
    assert!(sv.trial().await.unwrap().is_none());

    insert_plan(&db, "Late trial", PlanAvailability::Trial, true, 5).await;
    insert_plan(&db, "Trial", PlanAvailability::Trial, true, 1).await;

    let trial = sv.trial_plan().await.unwrap().unwrap();
    assert_eq!(trial.name, "Trial");
  }
}
