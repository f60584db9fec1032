//! Transactions API endpoints

use api_types::transaction::{Transaction, TransactionNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{ServerError, goals::parse_goal_id, server::Owner, server::ServerState};

fn transaction_view(tx: engine::Transaction) -> Transaction {
    Transaction {
        id: tx.id,
        goal_id: tx.goal_id,
        owner_id: tx.owner_id,
        amount: tx.amount,
        transaction_date: tx.transaction_date,
        description: tx.description,
    }
}

pub async fn transaction_new(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<Transaction>, ServerError> {
    let goal_id = parse_goal_id(&payload.goal_id)?;
    let outcome = state
        .engine
        .post_transaction(engine::DepositCmd {
            goal_id,
            amount: payload.amount,
            description: payload.description,
            transaction_date: payload.transaction_date,
            owner_id: owner.0,
        })
        .await?;

    if outcome.completed_now {
        tracing::info!(
            "goal {} reached its target of {}",
            outcome.goal.id,
            outcome.goal.target_amount
        );
    }

    Ok(Json(transaction_view(outcome.transaction)))
}

/// List the transactions of a goal.
///
/// An unknown goal id yields an empty list rather than a 404.
pub async fn list(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, ServerError> {
    let Ok(goal_id) = parse_goal_id(&goal_id) else {
        return Ok(Json(Vec::new()));
    };

    let txs = state.engine.transactions(goal_id, owner.id()).await?;
    Ok(Json(txs.into_iter().map(transaction_view).collect()))
}
