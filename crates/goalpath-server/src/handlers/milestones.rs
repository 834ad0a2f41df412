//! Milestone handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::{parse_body, AppError, AppState};
use goalpath_core::{Goal, MilestoneEvent, NotifiedMilestones};

/// Request body for milestone evaluation
#[derive(Debug, Deserialize)]
pub struct MilestoneRequest {
    pub goals: Vec<Goal>,
    /// Milestones the caller has already notified
    #[serde(default)]
    pub notified: NotifiedMilestones,
}

/// POST /api/milestones - Milestones crossed but not yet notified
///
/// Evaluation is pure: the caller records the returned events in its own
/// notified set before the next call.
pub async fn evaluate_milestones(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MilestoneRequest>, JsonRejection>,
) -> Result<Json<Vec<MilestoneEvent>>, AppError> {
    let req = parse_body(payload)?;
    Ok(Json(state.tracker.evaluate_all(&req.goals, &req.notified)))
}
