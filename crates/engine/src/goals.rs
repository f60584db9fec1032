//! The module contains `Goal` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, estimator::Estimate, util::parse_uuid};

/// A savings goal.
///
/// `current_amount` is the running sum of every deposit posted against the
/// goal. `completion_date` is set the first time the goal reaches its target
/// and is never overwritten afterwards, even if later deposits bring the
/// amount back under the target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub owner_id: Option<String>,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub completed: bool,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: String, target_amount: f64, owner_id: Option<String>) -> ResultEngine<Self> {
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "target_amount must be > 0".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            target_amount,
            current_amount: 0.0,
            completed: false,
            completion_date: None,
            created_date: Utc::now(),
        })
    }

    pub fn remaining_amount(&self) -> f64 {
        self.target_amount - self.current_amount
    }

    /// Share of the target already saved, in percent.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_amount / self.target_amount * 100.0
        } else {
            0.0
        }
    }
}

/// A goal together with its projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: Goal,
    pub progress_percentage: f64,
    pub remaining_amount: f64,
    pub estimate: Estimate,
}

impl GoalProgress {
    pub fn new(goal: Goal, estimate: Estimate) -> Self {
        Self {
            progress_percentage: goal.progress_percentage(),
            remaining_amount: goal.remaining_amount(),
            goal,
            estimate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: Option<String>,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub completed: bool,
    pub completion_date: Option<DateTimeUtc>,
    pub created_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            owner_id: ActiveValue::Set(goal.owner_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_amount: ActiveValue::Set(goal.target_amount),
            current_amount: ActiveValue::Set(goal.current_amount),
            completed: ActiveValue::Set(goal.completed),
            completion_date: ActiveValue::Set(goal.completion_date),
            created_date: ActiveValue::Set(goal.created_date),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal")?,
            owner_id: model.owner_id,
            name: model.name,
            target_amount: model.target_amount,
            current_amount: model.current_amount,
            completed: model.completed,
            completion_date: model.completion_date,
            created_date: model.created_date,
        })
    }
}
