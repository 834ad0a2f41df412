//! Plan and priority handlers

use axum::{extract::rejection::JsonRejection, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{parse_body, resolve_as_of, AppError};
use goalpath_core::{
    FinancialPlan, FinancialProfile, Goal, PlanBuilder, PlanGoal, PriorityCriteria,
    PriorityScorer, PriorityUpdate,
};

/// Request body for a periodic plan
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub profile: FinancialProfile,
    #[serde(default)]
    pub goals: Vec<PlanGoal>,
    pub as_of: Option<NaiveDate>,
}

/// POST /api/plans - Prioritise active goals and allocate disposable income
pub async fn create_plan(
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<FinancialPlan>, AppError> {
    let req = parse_body(payload)?;
    let plan = PlanBuilder::build(&req.profile, &req.goals, resolve_as_of(req.as_of))?;
    Ok(Json(plan))
}

/// Request body for scoring a single goal
#[derive(Debug, Deserialize)]
pub struct PriorityRequest {
    pub goal: Goal,
    #[serde(default)]
    pub criteria: PriorityCriteria,
    pub as_of: Option<NaiveDate>,
}

/// POST /api/priorities - Score a goal and derive its new tier
pub async fn score_priority(
    payload: Result<Json<PriorityRequest>, JsonRejection>,
) -> Result<Json<PriorityUpdate>, AppError> {
    let req = parse_body(payload)?;
    let update = PriorityScorer::evaluate(&req.goal, &req.criteria, resolve_as_of(req.as_of));
    Ok(Json(update))
}
