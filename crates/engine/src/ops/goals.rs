use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{ActiveModelTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Goal, GoalProgress, ResultEngine, estimator, estimator::Deposit, goals,
    transactions, users,
    util::normalize_required_name,
};

use super::{Engine, goal_scope, with_tx};

impl Engine {
    /// Create an empty goal.
    ///
    /// When `owner_id` is set the user must exist.
    pub async fn create_goal(
        &self,
        name: &str,
        target_amount: f64,
        owner_id: Option<&str>,
    ) -> ResultEngine<Goal> {
        let name = normalize_required_name(name, "goal")?;
        let goal = Goal::new(name, target_amount, owner_id.map(ToString::to_string))?;

        with_tx!(self, |db_tx| {
            if let Some(owner_id) = owner_id {
                users::Entity::find_by_id(owner_id.to_string())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("User".to_string()))?;
            }

            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Return every goal visible from `owner_id`, oldest first.
    pub async fn goals(&self, owner_id: Option<&str>) -> ResultEngine<Vec<Goal>> {
        goals::Entity::find()
            .filter(goal_scope(owner_id))
            .order_by_asc(goals::Column::CreatedDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }

    /// Return a goal snapshot from DB.
    pub async fn goal(&self, goal_id: Uuid, owner_id: Option<&str>) -> ResultEngine<Goal> {
        let model = self
            .require_goal(&self.database, goal_id, owner_id)
            .await?;
        Goal::try_from(model)
    }

    /// Delete a goal together with all of its transactions.
    pub async fn delete_goal(&self, goal_id: Uuid, owner_id: Option<&str>) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, goal_id, owner_id).await?;

            transactions::Entity::delete_many()
                .filter(transactions::Column::GoalId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            goals::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            Ok(())
        })
    }

    /// Progress of a goal with a projection based on the current time.
    pub async fn goal_progress(
        &self,
        goal_id: Uuid,
        owner_id: Option<&str>,
    ) -> ResultEngine<GoalProgress> {
        self.goal_progress_at(goal_id, owner_id, Utc::now()).await
    }

    /// Progress of a goal, projecting from `now`.
    pub async fn goal_progress_at(
        &self,
        goal_id: Uuid,
        owner_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> ResultEngine<GoalProgress> {
        let goal = self.goal(goal_id, owner_id).await?;

        let history: Vec<Deposit> = transactions::Entity::find()
            .filter(transactions::Column::GoalId.eq(goal.id.to_string()))
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Deposit {
                amount: model.amount,
                date: model.transaction_date,
            })
            .collect();

        let estimate = estimator::estimate(goal.target_amount, goal.current_amount, &history, now);
        Ok(GoalProgress::new(goal, estimate))
    }
}
