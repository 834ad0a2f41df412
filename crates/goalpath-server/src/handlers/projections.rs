//! Projection, life-scenario and simulation handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::{parse_body, resolve_as_of, AppError, AppState};
use goalpath_core::{
    analyze_life_scenarios, simulate, AdjustmentPipeline, EducationLevel, FinancialProfile, Goal,
    IncomeGrowth, LifeScenarioAnalysis, ProjectionResult, RefreshedBalances, SimulationConfig,
    SimulationSummary,
};

/// Optional transforms applied after the base projection, in this order
#[derive(Debug, Default, Deserialize)]
pub struct AdjustmentsRequest {
    /// Re-project from a freshly aggregated savings balance
    pub refreshed_savings: Option<f64>,
    /// Grow contributions yearly by education level
    pub education: Option<EducationLevel>,
}

impl AdjustmentsRequest {
    fn pipeline(&self) -> Result<AdjustmentPipeline, AppError> {
        let mut pipeline = AdjustmentPipeline::new();
        if let Some(savings) = self.refreshed_savings {
            pipeline.register(Box::new(RefreshedBalances::new(savings)?));
        }
        if let Some(level) = self.education {
            pipeline.register(Box::new(IncomeGrowth::new(level)));
        }
        Ok(pipeline)
    }
}

/// Request body for projecting one goal
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub profile: FinancialProfile,
    pub goal: Goal,
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub adjustments: AdjustmentsRequest,
}

/// POST /api/projections - Project a goal across every investment option
///
/// Returns all scenarios in catalog order, the recommended strategy and the
/// goal insights. Adjustments, when given, are applied to the result.
pub async fn create_projection(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Result<Json<ProjectionResult>, AppError> {
    let req = parse_body(payload)?;
    let as_of = resolve_as_of(req.as_of);

    let result = state.engine.project(&req.goal, &req.profile, as_of)?;
    let pipeline = req.adjustments.pipeline()?;
    let result = if pipeline.is_empty() {
        result
    } else {
        debug!(goal_id = %req.goal.id(), adjustments = pipeline.len(), "Applying adjustments");
        pipeline.apply(result)?
    };

    Ok(Json(result))
}

/// Request body for a life-scenario comparison
#[derive(Debug, Deserialize)]
pub struct LifeScenarioRequest {
    pub profile: FinancialProfile,
    pub goal: Goal,
    pub as_of: Option<NaiveDate>,
}

/// POST /api/life-scenarios - Base, optimistic, pessimistic and unexpected-event outcomes
pub async fn analyze_scenarios(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LifeScenarioRequest>, JsonRejection>,
) -> Result<Json<LifeScenarioAnalysis>, AppError> {
    let req = parse_body(payload)?;
    let analysis = analyze_life_scenarios(
        &req.goal,
        &req.profile,
        resolve_as_of(req.as_of),
        state.config.projection.max_horizon_months,
    );
    Ok(Json(analysis))
}

/// Request body for a Monte Carlo run
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub profile: FinancialProfile,
    pub goal: Goal,
    /// Investment option name (case-insensitive)
    pub option: String,
    pub iterations: Option<u32>,
    pub seed: Option<u64>,
    pub as_of: Option<NaiveDate>,
}

/// POST /api/simulations - Seeded Monte Carlo outcome distribution
pub async fn run_simulation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationSummary>, AppError> {
    let req = parse_body(payload)?;

    let option = state.config.option_by_name(&req.option).ok_or_else(|| {
        AppError::not_found(&format!("Investment option '{}' not found", req.option))
    })?;

    let mut config = SimulationConfig::from_settings(&state.config.simulation)
        .with_max_horizon(state.config.projection.max_horizon_months);
    if let Some(iterations) = req.iterations {
        config = config.with_iterations(iterations);
    }
    if let Some(seed) = req.seed {
        config = config.with_seed(seed);
    }

    let summary = simulate(
        &req.goal,
        &req.profile,
        option,
        &config,
        resolve_as_of(req.as_of),
    )?;
    Ok(Json(summary))
}
