use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveModelTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    Goal, ResultEngine, Transaction, goals, transactions, util::normalize_optional_text,
};

use super::{Engine, with_tx};

/// Request to record a deposit against a goal.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub goal_id: Uuid,
    /// Any finite amount; negative values are accepted as withdrawals.
    pub amount: f64,
    pub description: Option<String>,
    /// Defaults to the time of the request.
    pub transaction_date: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
}

/// Result of a posted deposit.
#[derive(Clone, Debug, PartialEq)]
pub struct DepositOutcome {
    pub transaction: Transaction,
    /// The goal after the deposit has been applied.
    pub goal: Goal,
    /// `true` only for the deposit that first brought the goal to its target.
    pub completed_now: bool,
}

impl Engine {
    /// Record a deposit and update the goal's running total.
    ///
    /// The total is incremented in SQL (`current_amount = current_amount + ?`),
    /// so concurrent deposits on the same goal never lose an update.
    /// `completion_date` is only written while it is still null.
    pub async fn post_transaction(&self, cmd: DepositCmd) -> ResultEngine<DepositOutcome> {
        let now = Utc::now();
        let owner_id = cmd.owner_id.as_deref();

        with_tx!(self, |db_tx| {
            let goal_model = self.require_goal(&db_tx, cmd.goal_id, owner_id).await?;

            let tx = Transaction::new(
                cmd.goal_id,
                goal_model.owner_id.clone(),
                cmd.amount,
                cmd.transaction_date.unwrap_or(now),
                normalize_optional_text(cmd.description.as_deref()),
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            goals::Entity::update_many()
                .col_expr(
                    goals::Column::CurrentAmount,
                    Expr::col(goals::Column::CurrentAmount).add(tx.amount),
                )
                .col_expr(
                    goals::Column::Completed,
                    Expr::expr(Expr::col(goals::Column::CurrentAmount).add(tx.amount))
                        .gte(Expr::col(goals::Column::TargetAmount)),
                )
                .filter(goals::Column::Id.eq(goal_model.id.clone()))
                .exec(&db_tx)
                .await?;

            let stamped = goals::Entity::update_many()
                .col_expr(goals::Column::CompletionDate, Expr::value(now))
                .filter(goals::Column::Id.eq(goal_model.id.clone()))
                .filter(goals::Column::Completed.eq(true))
                .filter(goals::Column::CompletionDate.is_null())
                .exec(&db_tx)
                .await?;

            let goal = self.require_goal(&db_tx, cmd.goal_id, owner_id).await?;

            Ok(DepositOutcome {
                transaction: tx,
                goal: Goal::try_from(goal)?,
                completed_now: stamped.rows_affected > 0,
            })
        })
    }

    /// Return the transactions of a goal, oldest first.
    ///
    /// A goal that does not exist (or is not visible from `owner_id`) has no
    /// transactions.
    pub async fn transactions(
        &self,
        goal_id: Uuid,
        owner_id: Option<&str>,
    ) -> ResultEngine<Vec<Transaction>> {
        let goal_id = goal_id.to_string();
        let visible = goals::Entity::find_by_id(goal_id.clone())
            .filter(super::goal_scope(owner_id))
            .one(&self.database)
            .await?
            .is_some();
        if !visible {
            return Ok(Vec::new());
        }

        transactions::Entity::find()
            .filter(transactions::Column::GoalId.eq(goal_id))
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
