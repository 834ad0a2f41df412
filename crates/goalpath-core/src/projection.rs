//! Projection engine
//!
//! Compound-growth projections of a single goal across the investment
//! catalog. Every scenario is derived on demand from the goal, the profile and
//! an explicit `as_of` date; nothing here reads the clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, ProjectionSettings};
use crate::error::{Error, Result};
use crate::insights::{GoalInsights, InsightGenerator};
use crate::models::{
    Catalog, FinancialProfile, Goal, InvestmentOption, ProjectionScenario, RiskTolerance, TimeToGoal,
};
use crate::optimizer::ScenarioOptimizer;

/// Share of disposable income a single goal may claim each month
pub const CONTRIBUTION_CAP: f64 = 0.3;

/// Whole months from `as_of` to `deadline`, floored at 1.
///
/// Day-of-month is ignored: 2026-01-31 to 2026-02-01 counts as one month.
pub fn months_to_goal(deadline: NaiveDate, as_of: NaiveDate) -> u32 {
    let months = (deadline.year() - as_of.year()) * 12 + deadline.month() as i32
        - as_of.month() as i32;
    if months < 1 {
        debug!(%deadline, %as_of, months, "Deadline is due or past, clamping horizon to 1 month");
        return 1;
    }
    months as u32
}

/// `min(remaining / months, disposable × 0.3)`, floored at 0
pub fn monthly_contribution(goal: &Goal, profile: &FinancialProfile, months: u32) -> f64 {
    let required = goal.remaining() / f64::from(months.max(1));
    let cap = profile.disposable_income() * CONTRIBUTION_CAP;
    if required > cap {
        debug!(
            goal_id = %goal.id(),
            required,
            cap,
            "Contribution capped by disposable income"
        );
    }
    required.min(cap).max(0.0)
}

/// Future value with monthly compounding.
///
/// `P·(1+r)^n + C·((1+r)^n − 1)/r` with `r = annual_return / 12`. A zero rate
/// uses the linear form `P + C·n`.
pub fn compound(existing_savings: f64, monthly_contribution: f64, annual_return: f64, months: u32) -> f64 {
    let n = f64::from(months);
    let r = annual_return / 12.0;
    if r == 0.0 {
        return existing_savings + monthly_contribution * n;
    }
    let growth = (1.0 + r).powf(n);
    existing_savings * growth + monthly_contribution * (growth - 1.0) / r
}

/// Contribution paid in `month` (1-based) when it steps up once per year
pub fn stepped_contribution(base: f64, annual_growth: f64, month: u32) -> f64 {
    let years = (month.saturating_sub(1) / 12) as i32;
    base * (1.0 + annual_growth).powi(years)
}

/// Money flowing into a projection: a starting balance plus a monthly
/// contribution that optionally grows once a year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Funding {
    pub existing_savings: f64,
    pub monthly_contribution: f64,
    /// Yearly step-up of the contribution (0 keeps it flat)
    #[serde(default)]
    pub contribution_growth: f64,
}

impl Funding {
    pub fn flat(existing_savings: f64, monthly_contribution: f64) -> Self {
        Self {
            existing_savings,
            monthly_contribution,
            contribution_growth: 0.0,
        }
    }

    fn contribution_for(&self, month: u32) -> f64 {
        stepped_contribution(self.monthly_contribution, self.contribution_growth, month)
    }

    /// Balance after `months` at the given annual return
    pub fn balance_after(&self, annual_return: f64, months: u32) -> f64 {
        if self.contribution_growth == 0.0 {
            return compound(
                self.existing_savings,
                self.monthly_contribution,
                annual_return,
                months,
            );
        }
        let r = annual_return / 12.0;
        (1..=months).fold(self.existing_savings, |balance, month| {
            balance * (1.0 + r) + self.contribution_for(month)
        })
    }

    /// First month at which the balance reaches `target`, searched up to `max_horizon`
    pub fn time_to_reach(&self, annual_return: f64, target: f64, max_horizon: u32) -> TimeToGoal {
        if self.existing_savings >= target {
            return TimeToGoal::Reached { months: 0 };
        }

        let r = annual_return / 12.0;
        let mut balance = self.existing_savings;
        for month in 1..=max_horizon {
            balance = if self.contribution_growth == 0.0 {
                self.balance_after(annual_return, month)
            } else {
                balance * (1.0 + r) + self.contribution_for(month)
            };
            if balance >= target {
                return TimeToGoal::Reached { months: month };
            }
        }

        TimeToGoal::Unreachable {
            horizon_months: max_horizon,
        }
    }

    /// Month-by-month balances for months `1..=months`
    pub fn schedule(&self, annual_return: f64, months: u32) -> Vec<f64> {
        let r = annual_return / 12.0;
        let mut balance = self.existing_savings;
        (1..=months)
            .map(|month| {
                balance = balance * (1.0 + r) + self.contribution_for(month);
                balance
            })
            .collect()
    }
}

/// Number of months until `compound(...)` reaches `target`, bounded by `max_horizon`
pub fn time_to_goal(
    existing_savings: f64,
    monthly_contribution: f64,
    annual_return: f64,
    target: f64,
    max_horizon: u32,
) -> TimeToGoal {
    Funding::flat(existing_savings, monthly_contribution).time_to_reach(annual_return, target, max_horizon)
}

/// One row of a growth schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub option: String,
    pub balance: f64,
}

/// Scenarios, recommendation and insights for one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub goal_id: String,
    pub target_amount: f64,
    pub risk_tolerance: RiskTolerance,
    pub months_to_goal: u32,
    pub funding: Funding,
    /// Cutoff used for unreachable scenarios
    pub max_horizon_months: u32,
    pub scenarios: Vec<ProjectionScenario>,
    pub recommended_strategy: ProjectionScenario,
    pub insights: GoalInsights,
    /// Names of the adjustments applied after the base projection, in order
    #[serde(default)]
    pub adjustments: Vec<String>,
}

impl ProjectionResult {
    pub fn monthly_contribution(&self) -> f64 {
        self.funding.monthly_contribution
    }

    /// Recompute every scenario from `funding`, then the recommendation and
    /// the insights that depend on projected amounts
    pub fn recompute(&mut self) -> Result<()> {
        for scenario in &mut self.scenarios {
            let rate = scenario.option.expected_annual_return();
            scenario.projected_amount = self.funding.balance_after(rate, self.months_to_goal);
            scenario.time_to_goal =
                self.funding
                    .time_to_reach(rate, self.target_amount, self.max_horizon_months);
        }

        ScenarioOptimizer::score_all(&mut self.scenarios, self.risk_tolerance);
        self.recommended_strategy = ScenarioOptimizer::select(&self.scenarios, self.risk_tolerance)
            .cloned()
            .ok_or_else(|| Error::invalid("projection has no scenarios"))?;
        self.insights.refresh(self.target_amount, &self.scenarios);
        Ok(())
    }
}

/// Computes compound-growth projections over a shared catalog
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    catalog: Catalog,
    settings: ProjectionSettings,
    insights: InsightGenerator,
}

impl ProjectionEngine {
    pub fn new(catalog: Catalog, settings: ProjectionSettings) -> Self {
        Self {
            catalog,
            insights: InsightGenerator::new(settings.inflation_rate),
            settings,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.catalog.clone(), config.projection)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    fn ensure_catalog(&self) -> Result<()> {
        if self.catalog.is_empty() {
            return Err(Error::invalid("investment catalog is empty"));
        }
        Ok(())
    }

    /// Funding used for a goal: existing savings plus the capped contribution
    pub fn funding_for(&self, goal: &Goal, profile: &FinancialProfile, as_of: NaiveDate) -> (u32, Funding) {
        let months = months_to_goal(goal.deadline(), as_of);
        let contribution = monthly_contribution(goal, profile, months);
        (months, Funding::flat(profile.existing_savings(), contribution))
    }

    /// One scenario per catalog option, in catalog order
    pub fn generate_scenarios(
        &self,
        goal: &Goal,
        profile: &FinancialProfile,
        as_of: NaiveDate,
    ) -> Result<Vec<ProjectionScenario>> {
        self.ensure_catalog()?;
        let (months, funding) = self.funding_for(goal, profile, as_of);

        let scenarios: Vec<ProjectionScenario> = self
            .catalog
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let rate = option.expected_annual_return();
                let time_to_goal =
                    funding.time_to_reach(rate, goal.target_amount(), self.settings.max_horizon_months);
                if !time_to_goal.is_reachable() {
                    debug!(
                        goal_id = %goal.id(),
                        option = option.name(),
                        horizon = self.settings.max_horizon_months,
                        "Scenario does not reach target within horizon"
                    );
                }
                ProjectionScenario {
                    option: option.clone(),
                    catalog_index: index,
                    horizon_months: months,
                    monthly_contribution: funding.monthly_contribution,
                    projected_amount: funding.balance_after(rate, months),
                    time_to_goal,
                    optimization_score: None,
                }
            })
            .collect();

        Ok(scenarios)
    }

    /// Full projection: scenarios, recommended strategy and insights
    pub fn project(&self, goal: &Goal, profile: &FinancialProfile, as_of: NaiveDate) -> Result<ProjectionResult> {
        let mut scenarios = self.generate_scenarios(goal, profile, as_of)?;
        let (months, funding) = self.funding_for(goal, profile, as_of);

        ScenarioOptimizer::score_all(&mut scenarios, profile.risk_tolerance());
        let recommended = ScenarioOptimizer::select(&scenarios, profile.risk_tolerance())
            .cloned()
            .ok_or_else(|| Error::invalid("investment catalog is empty"))?;
        let insights = self
            .insights
            .generate(goal, months, &scenarios, profile.disposable_income());

        debug!(
            goal_id = %goal.id(),
            months,
            scenarios = scenarios.len(),
            recommended = recommended.option.name(),
            "Projection complete"
        );

        Ok(ProjectionResult {
            goal_id: goal.id().to_string(),
            target_amount: goal.target_amount(),
            risk_tolerance: profile.risk_tolerance(),
            months_to_goal: months,
            funding,
            max_horizon_months: self.settings.max_horizon_months,
            scenarios,
            recommended_strategy: recommended,
            insights,
            adjustments: Vec::new(),
        })
    }

    /// Month-by-month balance of every option up to the goal's horizon
    pub fn growth_schedule(
        &self,
        goal: &Goal,
        profile: &FinancialProfile,
        as_of: NaiveDate,
    ) -> Result<Vec<ScheduleRow>> {
        self.ensure_catalog()?;
        let (months, funding) = self.funding_for(goal, profile, as_of);
        if months > self.settings.max_horizon_months {
            return Err(Error::invalid(format!(
                "goal '{}' is {} months away; schedules are limited to {} months",
                goal.id(),
                months,
                self.settings.max_horizon_months
            )));
        }
        Ok(schedule_rows(&self.catalog, &funding, months))
    }
}

/// Growth schedule rows for a catalog, month-major then catalog order
pub fn schedule_rows(catalog: &[InvestmentOption], funding: &Funding, months: u32) -> Vec<ScheduleRow> {
    let per_option: Vec<Vec<f64>> = catalog
        .iter()
        .map(|o| funding.schedule(o.expected_annual_return(), months))
        .collect();

    let mut rows = Vec::with_capacity(catalog.len() * months as usize);
    for month in 1..=months {
        for (option, balances) in catalog.iter().zip(&per_option) {
            rows.push(ScheduleRow {
                month,
                option: option.name().to_string(),
                balance: balances[(month - 1) as usize],
            });
        }
    }
    rows
}
