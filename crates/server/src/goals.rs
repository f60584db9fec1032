//! Goals API endpoints.

use api_types::{
    Message,
    goal::{Goal, GoalNew, GoalProgress},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::EngineError;
use uuid::Uuid;

use crate::{ServerError, server::Owner, server::ServerState};

/// Parse a goal id coming from the URL or a request body.
///
/// Anything that is not a UUID cannot name an existing goal.
pub(crate) fn parse_goal_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound("Goal".to_string()).into())
}

pub(crate) fn goal_view(goal: engine::Goal) -> Goal {
    Goal {
        id: goal.id,
        owner_id: goal.owner_id,
        name: goal.name,
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        created_date: goal.created_date,
        completed: goal.completed,
        completion_date: goal.completion_date,
    }
}

pub async fn goal_new(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<Json<Goal>, ServerError> {
    let goal = state
        .engine
        .create_goal(&payload.name, payload.target_amount, owner.id())
        .await?;
    tracing::info!("created goal {} ({})", goal.id, goal.name);

    Ok(Json(goal_view(goal)))
}

pub async fn list(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Goal>>, ServerError> {
    let goals = state.engine.goals(owner.id()).await?;
    Ok(Json(goals.into_iter().map(goal_view).collect()))
}

pub async fn get(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<String>,
) -> Result<Json<Goal>, ServerError> {
    let goal_id = parse_goal_id(&goal_id)?;
    let goal = state.engine.goal(goal_id, owner.id()).await?;
    Ok(Json(goal_view(goal)))
}

pub async fn progress(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<String>,
) -> Result<Json<GoalProgress>, ServerError> {
    let goal_id = parse_goal_id(&goal_id)?;
    let progress = state.engine.goal_progress(goal_id, owner.id()).await?;

    Ok(Json(GoalProgress {
        progress_percentage: progress.progress_percentage,
        remaining_amount: progress.remaining_amount,
        estimated_days_to_completion: progress.estimate.estimated_days_to_completion,
        estimated_completion_date: progress.estimate.estimated_completion_date,
        average_daily_savings: progress.estimate.average_daily_savings,
        goal: goal_view(progress.goal),
    }))
}

pub async fn delete(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    let goal_id = parse_goal_id(&goal_id)?;
    state.engine.delete_goal(goal_id, owner.id()).await?;
    tracing::info!("deleted goal {goal_id} and its transactions");

    Ok(Json(Message::new("Goal deleted successfully")))
}
