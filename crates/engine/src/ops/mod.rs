use sea_orm::{
    ConnectionTrait, DatabaseConnection, QueryFilter, prelude::*, sea_query::SimpleExpr,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

mod goals;
mod transactions;
mod users;

pub use transactions::{DepositCmd, DepositOutcome};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Load a goal visible from `owner_id`.
    ///
    /// A goal owned by someone else is reported exactly like a missing one.
    async fn require_goal<C: ConnectionTrait>(
        &self,
        db: &C,
        goal_id: Uuid,
        owner_id: Option<&str>,
    ) -> ResultEngine<crate::goals::Model> {
        crate::goals::Entity::find_by_id(goal_id.to_string())
            .filter(goal_scope(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Goal".to_string()))
    }
}

/// Ownership filter applied to every goal lookup.
///
/// Anonymous callers only see goals without an owner.
fn goal_scope(owner_id: Option<&str>) -> SimpleExpr {
    match owner_id {
        Some(owner_id) => crate::goals::Column::OwnerId.eq(owner_id),
        None => crate::goals::Column::OwnerId.is_null(),
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
