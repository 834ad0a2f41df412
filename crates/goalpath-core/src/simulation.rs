//! Seeded Monte Carlo simulation
//!
//! Samples monthly returns around an option's expected return and reports the
//! distribution of final balances. All paths draw in order from one `StdRng`
//! seeded with the caller's seed, so identical inputs always give identical
//! output.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProjectionSettings, SimulationSettings};
use crate::error::{ensure_non_negative, Error, Result};
use crate::models::{FinancialProfile, Goal, InvestmentOption};
use crate::projection::{monthly_contribution, months_to_goal};

/// Iteration count, seed and volatility for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub iterations: u32,
    pub seed: u64,
    /// Annualised standard deviation of returns
    pub return_volatility: f64,
    pub max_iterations: u32,
    /// Longest horizon a run may sample
    #[serde(default = "default_max_horizon")]
    pub max_horizon_months: u32,
}

fn default_max_horizon() -> u32 {
    ProjectionSettings::default().max_horizon_months
}

impl SimulationConfig {
    pub fn from_settings(settings: &SimulationSettings) -> Self {
        Self {
            iterations: settings.default_iterations,
            seed: settings.default_seed,
            return_volatility: settings.return_volatility,
            max_iterations: settings.max_iterations,
            max_horizon_months: default_max_horizon(),
        }
    }

    /// Cap the sampled horizon, usually at `ProjectionSettings::max_horizon_months`
    pub fn with_max_horizon(mut self, months: u32) -> Self {
        self.max_horizon_months = months;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 || self.iterations > self.max_iterations {
            return Err(Error::invalid(format!(
                "iterations must be within 1..={} (got {})",
                self.max_iterations, self.iterations
            )));
        }
        ensure_non_negative("return_volatility", self.return_volatility)?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_settings(&SimulationSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub goal_id: String,
    pub option: String,
    pub iterations: u32,
    pub seed: u64,
    pub months: u32,
    pub monthly_contribution: f64,
    pub target_amount: f64,
    /// Share of paths ending at or above the target
    pub success_probability: f64,
    pub mean: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Run `config.iterations` sampled paths for one goal and option
pub fn simulate(
    goal: &Goal,
    profile: &FinancialProfile,
    option: &InvestmentOption,
    config: &SimulationConfig,
    as_of: NaiveDate,
) -> Result<SimulationSummary> {
    config.validate()?;

    let months = months_to_goal(goal.deadline(), as_of);
    if months > config.max_horizon_months {
        return Err(Error::invalid(format!(
            "goal '{}' is {} months away; simulations are limited to {} months",
            goal.id(),
            months,
            config.max_horizon_months
        )));
    }
    let contribution = monthly_contribution(goal, profile, months);
    let mean_return = option.expected_annual_return() / 12.0;
    let monthly_sigma = config.return_volatility / 12f64.sqrt();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut finals: Vec<f64> = (0..config.iterations)
        .map(|_| {
            (0..months).fold(profile.existing_savings(), |balance, _| {
                let z: f64 = StandardNormal.sample(&mut rng);
                let rho = mean_return + monthly_sigma * z;
                (balance * (1.0 + rho) + contribution).max(0.0)
            })
        })
        .collect();

    let target = goal.target_amount();
    let successes = finals.iter().filter(|b| **b >= target).count();
    let n = finals.len() as f64;
    let mean = finals.iter().sum::<f64>() / n;

    let summary = SimulationSummary {
        goal_id: goal.id().to_string(),
        option: option.name().to_string(),
        iterations: config.iterations,
        seed: config.seed,
        months,
        monthly_contribution: contribution,
        target_amount: target,
        success_probability: successes as f64 / n,
        mean,
        p10: percentile(&mut finals, 10.0),
        p50: percentile(&mut finals, 50.0),
        p90: percentile(&mut finals, 90.0),
    };

    debug!(
        goal_id = %goal.id(),
        option = option.name(),
        iterations = config.iterations,
        seed = config.seed,
        success = summary.success_probability,
        "Simulation complete"
    );
    Ok(summary)
}

/// Linear-interpolated percentile; sorts `values` in place
fn percentile(values: &mut [f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len();
    if n == 1 {
        return values[0];
    }

    let rank = (p / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        values[lower]
    } else {
        let w = rank - lower as f64;
        values[lower] * (1.0 - w) + values[upper] * w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTolerance;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inputs() -> (Goal, FinancialProfile, InvestmentOption) {
        (
            Goal::new("g1", "Home", 40_000.0, 0.0, date(2029, 1, 1)).unwrap(),
            FinancialProfile::new(9_000.0, 5_000.0, 5_000.0, RiskTolerance::High, 30).unwrap(),
            InvestmentOption::new("Mutual Funds", 0.12, 0.5, 0.6).unwrap(),
        )
    }

    #[test]
    fn test_same_seed_same_result() {
        let (goal, profile, option) = inputs();
        let config = SimulationConfig::default().with_iterations(200).with_seed(7);
        let a = simulate(&goal, &profile, &option, &config, date(2026, 1, 1)).unwrap();
        let b = simulate(&goal, &profile, &option, &config, date(2026, 1, 1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.iterations, 200);
        assert_eq!(a.seed, 7);
    }

    #[test]
    fn test_different_seed_differs() {
        let (goal, profile, option) = inputs();
        let base = SimulationConfig::default().with_iterations(200);
        let a = simulate(&goal, &profile, &option, &base.with_seed(1), date(2026, 1, 1)).unwrap();
        let b = simulate(&goal, &profile, &option, &base.with_seed(2), date(2026, 1, 1)).unwrap();
        assert_ne!(a.mean, b.mean);
    }

    #[test]
    fn test_zero_volatility_matches_closed_form() {
        let (goal, profile, option) = inputs();
        let mut config = SimulationConfig::default().with_iterations(10);
        config.return_volatility = 0.0;

        let summary = simulate(&goal, &profile, &option, &config, date(2026, 1, 1)).unwrap();
        let expected = crate::projection::compound(
            profile.existing_savings(),
            summary.monthly_contribution,
            option.expected_annual_return(),
            summary.months,
        );
        assert!((summary.p50 - expected).abs() < 1e-6 * expected);
        assert!((summary.p10 - summary.p90).abs() < 1e-9);
    }

    #[test]
    fn test_percentiles_ordered() {
        let (goal, profile, option) = inputs();
        let summary =
            simulate(&goal, &profile, &option, &SimulationConfig::default(), date(2026, 1, 1)).unwrap();
        assert!(summary.p10 <= summary.p50 && summary.p50 <= summary.p90);
        assert!((0.0..=1.0).contains(&summary.success_probability));
    }

    #[test]
    fn test_iteration_cap_enforced() {
        let (goal, profile, option) = inputs();
        let too_many = SimulationConfig::default().with_iterations(10_001);
        let err = simulate(&goal, &profile, &option, &too_many, date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let zero = SimulationConfig::default().with_iterations(0);
        assert!(simulate(&goal, &profile, &option, &zero, date(2026, 1, 1)).is_err());
    }

    #[test]
    fn test_percentile_interpolates() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&mut values, 0.0), 1.0);
        assert_eq!(percentile(&mut values, 100.0), 4.0);
        assert!((percentile(&mut values, 50.0) - 2.5).abs() < 1e-12);
        assert_eq!(percentile(&mut [], 50.0), 0.0);
    }

    #[test]
    fn test_far_deadline_rejected() {
        let (_, profile, option) = inputs();
        let goal = Goal::new("g2", "Legacy", 40_000.0, 0.0, date(9999, 12, 1)).unwrap();
        let config = SimulationConfig::default().with_iterations(10);
        let err = simulate(&goal, &profile, &option, &config, date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let capped = config.with_max_horizon(24);
        assert!(simulate(&goal, &profile, &option, &capped, date(2026, 1, 1)).is_err());
        let near = Goal::new("g3", "Trip", 4_000.0, 0.0, date(2027, 1, 1)).unwrap();
        let summary = simulate(&near, &profile, &option, &capped, date(2026, 1, 1)).unwrap();
        assert_eq!(summary.months, 12);
    }
}
