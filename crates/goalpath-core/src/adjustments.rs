//! Projection adjustments
//!
//! Enhanced projections are pure transforms over a [`ProjectionResult`]. Each
//! adjustment changes the funding the projection is based on and re-derives
//! scenarios, recommendation and insights. A pipeline applies them in
//! registration order and records each one by name on the result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_non_negative, Result};
use crate::projection::ProjectionResult;

/// A pure `ProjectionResult -> ProjectionResult` transform
pub trait ProjectionAdjustment: Send + Sync {
    /// Identifier recorded in `ProjectionResult::adjustments`
    fn name(&self) -> &'static str;

    fn apply(&self, result: ProjectionResult) -> Result<ProjectionResult>;
}

/// Applies registered adjustments in order
#[derive(Default)]
pub struct AdjustmentPipeline {
    adjustments: Vec<Box<dyn ProjectionAdjustment>>,
}

impl AdjustmentPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adjustment: Box<dyn ProjectionAdjustment>) {
        self.adjustments.push(adjustment);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, adjustment: impl ProjectionAdjustment + 'static) -> Self {
        self.register(Box::new(adjustment));
        self
    }

    pub fn len(&self) -> usize {
        self.adjustments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    pub fn apply(&self, mut result: ProjectionResult) -> Result<ProjectionResult> {
        for adjustment in &self.adjustments {
            result = adjustment.apply(result)?;
            result.adjustments.push(adjustment.name().to_string());
            debug!(
                goal_id = %result.goal_id,
                adjustment = adjustment.name(),
                recommended = result.recommended_strategy.option.name(),
                "Adjustment applied"
            );
        }
        Ok(result)
    }
}

/// Re-projects with a refreshed aggregated savings figure.
///
/// Every projected amount moves by `Δsavings × (1 + r/12)^n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshedBalances {
    refreshed_savings: f64,
}

impl RefreshedBalances {
    pub fn new(refreshed_savings: f64) -> Result<Self> {
        Ok(Self {
            refreshed_savings: ensure_non_negative("refreshed_savings", refreshed_savings)?,
        })
    }
}

impl ProjectionAdjustment for RefreshedBalances {
    fn name(&self) -> &'static str {
        "refreshed_balances"
    }

    fn apply(&self, mut result: ProjectionResult) -> Result<ProjectionResult> {
        debug!(
            goal_id = %result.goal_id,
            previous = result.funding.existing_savings,
            refreshed = self.refreshed_savings,
            "Refreshing savings balance"
        );
        result.funding.existing_savings = self.refreshed_savings;
        result.recompute()?;
        Ok(result)
    }
}

/// Highest completed education, used to scale yearly contribution growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Secondary,
    Undergraduate,
    Postgraduate,
    Professional,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secondary => "secondary",
            Self::Undergraduate => "undergraduate",
            Self::Postgraduate => "postgraduate",
            Self::Professional => "professional",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Secondary => 0.8,
            Self::Undergraduate => 1.0,
            Self::Postgraduate => 1.2,
            Self::Professional => 1.4,
        }
    }
}

impl FromStr for EducationLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "secondary" => Ok(Self::Secondary),
            "undergraduate" => Ok(Self::Undergraduate),
            "postgraduate" => Ok(Self::Postgraduate),
            "professional" => Ok(Self::Professional),
            _ => Err(format!("Unknown education level: {}", s)),
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Yearly income growth before the education multiplier
pub const BASE_INCOME_GROWTH: f64 = 0.05;

/// Steps the monthly contribution up once a year with expected income growth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeGrowth {
    education: EducationLevel,
    base_growth: f64,
}

impl IncomeGrowth {
    pub fn new(education: EducationLevel) -> Self {
        Self {
            education,
            base_growth: BASE_INCOME_GROWTH,
        }
    }

    pub fn annual_growth(&self) -> f64 {
        self.base_growth * self.education.multiplier()
    }
}

impl ProjectionAdjustment for IncomeGrowth {
    fn name(&self) -> &'static str {
        "income_growth"
    }

    fn apply(&self, mut result: ProjectionResult) -> Result<ProjectionResult> {
        result.funding.contribution_growth = self.annual_growth();
        result.recompute()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_catalog, ProjectionSettings};
    use crate::models::{FinancialProfile, Goal, RiskTolerance};
    use crate::projection::ProjectionEngine;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_result() -> ProjectionResult {
        let engine = ProjectionEngine::new(default_catalog(), ProjectionSettings::default());
        let goal = Goal::new("g1", "Home", 50_000.0, 0.0, date(2029, 1, 1)).unwrap();
        let profile = FinancialProfile::new(8_000.0, 5_000.0, 2_000.0, RiskTolerance::Medium, 32).unwrap();
        engine.project(&goal, &profile, date(2026, 1, 1)).unwrap()
    }

    #[test]
    fn test_refreshed_balances_shift() {
        let base = base_result();
        let adjusted = RefreshedBalances::new(5_000.0).unwrap().apply(base.clone()).unwrap();

        let n = base.months_to_goal as i32;
        for (before, after) in base.scenarios.iter().zip(&adjusted.scenarios) {
            let r = before.option.expected_annual_return() / 12.0;
            let expected = before.projected_amount + 3_000.0 * (1.0 + r).powi(n);
            assert!((after.projected_amount - expected).abs() < 1e-6);
        }
        assert!(adjusted.insights.shortfall <= base.insights.shortfall);
    }

    #[test]
    fn test_income_growth_raises_projection() {
        let base = base_result();
        let adjusted = IncomeGrowth::new(EducationLevel::Professional).apply(base.clone()).unwrap();

        assert!((adjusted.funding.contribution_growth - 0.07).abs() < 1e-12);
        for (before, after) in base.scenarios.iter().zip(&adjusted.scenarios) {
            assert!(after.projected_amount > before.projected_amount);
        }
    }

    #[test]
    fn test_pipeline_records_names_in_order() {
        let pipeline = AdjustmentPipeline::new()
            .with(RefreshedBalances::new(3_000.0).unwrap())
            .with(IncomeGrowth::new(EducationLevel::Undergraduate));
        assert_eq!(pipeline.len(), 2);

        let result = pipeline.apply(base_result()).unwrap();
        assert_eq!(result.adjustments, vec!["refreshed_balances", "income_growth"]);
        assert!(result.recommended_strategy.optimization_score.is_some());
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let base = base_result();
        assert_eq!(AdjustmentPipeline::new().apply(base.clone()).unwrap(), base);
    }

    #[test]
    fn test_education_level_parse() {
        assert_eq!("PostGraduate".parse::<EducationLevel>().unwrap(), EducationLevel::Postgraduate);
        assert!("phd".parse::<EducationLevel>().is_err());
        assert!(RefreshedBalances::new(-1.0).is_err());
    }
}
