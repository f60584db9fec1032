//! Transaction primitives.
//!
//! A `Transaction` is an immutable deposit recorded against a goal. It is
//! never updated: the only way to remove one is to delete its goal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub owner_id: Option<String>,
    pub amount: f64,
    pub transaction_date: DateTime<Utc>,
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        goal_id: Uuid,
        owner_id: Option<String>,
        amount: f64,
        transaction_date: DateTime<Utc>,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if !amount.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            goal_id,
            owner_id,
            amount,
            transaction_date,
            description,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub goal_id: String,
    pub owner_id: Option<String>,
    pub amount: f64,
    pub transaction_date: DateTimeUtc,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goals::Entity",
        from = "Column::GoalId",
        to = "super::goals::Column::Id"
    )]
    Goal,
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            goal_id: ActiveValue::Set(tx.goal_id.to_string()),
            owner_id: ActiveValue::Set(tx.owner_id.clone()),
            amount: ActiveValue::Set(tx.amount),
            transaction_date: ActiveValue::Set(tx.transaction_date),
            description: ActiveValue::Set(tx.description.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            goal_id: parse_uuid(&model.goal_id, "goal")?,
            owner_id: model.owner_id,
            amount: model.amount,
            transaction_date: model.transaction_date,
            description: model.description,
        })
    }
}
