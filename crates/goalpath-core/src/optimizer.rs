//! Scenario optimizer
//!
//! Scores projected scenarios against the investor's risk tolerance and picks
//! the best one. Selection is stable: among equal scores the option listed
//! first in the catalog wins.

use tracing::debug;

use crate::models::{ProjectionScenario, RiskTolerance};

const PROJECTED_WEIGHT: f64 = 0.4;
const SAFETY_WEIGHT: f64 = 0.3;
const SAFETY_SCALE: f64 = 1000.0;
const LIQUIDITY_WEIGHT: f64 = 0.2;
const LIQUIDITY_SCALE: f64 = 500.0;
const RETURN_SCALE: f64 = 2000.0;

pub struct ScenarioOptimizer;

impl ScenarioOptimizer {
    /// Weighted score of one scenario
    pub fn score(scenario: &ProjectionScenario, risk_tolerance: RiskTolerance) -> f64 {
        let option = &scenario.option;
        scenario.projected_amount * PROJECTED_WEIGHT
            + (1.0 - option.risk_level()) * SAFETY_SCALE * SAFETY_WEIGHT
            + option.liquidity_score() * LIQUIDITY_SCALE * LIQUIDITY_WEIGHT
            + option.expected_annual_return() * RETURN_SCALE * risk_tolerance.return_multiplier()
    }

    /// Fill in `optimization_score` on every scenario
    pub fn score_all(scenarios: &mut [ProjectionScenario], risk_tolerance: RiskTolerance) {
        for scenario in scenarios.iter_mut() {
            scenario.optimization_score = Some(Self::score(scenario, risk_tolerance));
        }
    }

    /// Highest-scoring scenario; ties go to the lowest catalog index
    pub fn select(
        scenarios: &[ProjectionScenario],
        risk_tolerance: RiskTolerance,
    ) -> Option<&ProjectionScenario> {
        let mut best: Option<(&ProjectionScenario, f64)> = None;

        for scenario in scenarios {
            let score = Self::score(scenario, risk_tolerance);
            let better = match best {
                None => true,
                Some((current, current_score)) => {
                    score > current_score
                        || (score == current_score && scenario.catalog_index < current.catalog_index)
                }
            };
            if better {
                best = Some((scenario, score));
            }
        }

        if let Some((scenario, score)) = best {
            debug!(
                option = scenario.option.name(),
                score,
                risk = risk_tolerance.as_str(),
                "Selected scenario"
            );
        }
        best.map(|(scenario, _)| scenario)
    }
}
