//! Endpoint for creating or updating a budget goal.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, category::CategoryName};

use super::core::{BudgetGoal, upsert_budget_goal};

/// The JSON body accepted when setting a budget goal.
#[derive(Debug, Deserialize)]
pub struct SetBudgetGoalRequest {
    /// The category the goal applies to.
    pub category: String,
    /// The monthly spending ceiling. Must be positive.
    pub monthly_limit: f64,
}

#[derive(Debug, Serialize)]
struct SetBudgetGoalResponse {
    message: &'static str,
    budget_goal: BudgetGoal,
}

/// Handle budget goal upsert requests.
///
/// Creates a goal for a new category or replaces the limit of an existing
/// one. Responds with 201 and the stored goal.
pub async fn set_budget_goal_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<SetBudgetGoalRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let category = CategoryName::new(&request.category)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let budget_goal = upsert_budget_goal(category, request.monthly_limit, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(SetBudgetGoalResponse {
            message: "Budget goal saved successfully",
            budget_goal,
        }),
    )
        .into_response())
}
