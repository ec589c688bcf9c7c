//! Endpoint for listing all budget goals.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{AppState, Error};

use super::core::{BudgetGoal, get_all_budget_goals};

#[derive(Debug, Serialize)]
struct BudgetGoalListResponse {
    count: usize,
    budget_goals: Vec<BudgetGoal>,
}

/// Handle requests for the budget goal list, ordered by category.
pub async fn list_budget_goals_endpoint(
    State(state): State<AppState>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let budget_goals = get_all_budget_goals(&connection)?;

    Ok(Json(BudgetGoalListResponse {
        count: budget_goals.len(),
        budget_goals,
    })
    .into_response())
}
