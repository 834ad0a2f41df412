//! Life-scenario analysis
//!
//! Replays one goal under four fixed sets of economic assumptions. Each
//! scenario keeps the goal's capped contribution, scales it by the share of
//! income lost to (or freed from) unexpected expenses, steps it up once a year
//! with income growth and compounds it at the scenario's market return.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FinancialProfile, Goal, TimeToGoal};
use crate::projection::{monthly_contribution, months_to_goal, Funding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeScenarioKind {
    Base,
    Optimistic,
    Pessimistic,
    UnexpectedEvent,
}

impl LifeScenarioKind {
    pub const ALL: [LifeScenarioKind; 4] = [
        LifeScenarioKind::Base,
        LifeScenarioKind::Optimistic,
        LifeScenarioKind::Pessimistic,
        LifeScenarioKind::UnexpectedEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeScenarioKind::Base => "base",
            LifeScenarioKind::Optimistic => "optimistic",
            LifeScenarioKind::Pessimistic => "pessimistic",
            LifeScenarioKind::UnexpectedEvent => "unexpected_event",
        }
    }

    pub fn assumptions(&self) -> LifeAssumptions {
        match self {
            LifeScenarioKind::Base => LifeAssumptions {
                income_growth: 0.05,
                market_return: 0.07,
                unexpected_expenses: 0.0,
            },
            // Negative expenses free up extra savings
            LifeScenarioKind::Optimistic => LifeAssumptions {
                income_growth: 0.10,
                market_return: 0.12,
                unexpected_expenses: -0.02,
            },
            LifeScenarioKind::Pessimistic => LifeAssumptions {
                income_growth: 0.02,
                market_return: 0.03,
                unexpected_expenses: 0.10,
            },
            LifeScenarioKind::UnexpectedEvent => LifeAssumptions {
                income_growth: 0.05,
                market_return: 0.07,
                unexpected_expenses: 0.30,
            },
        }
    }
}

impl fmt::Display for LifeScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Economic assumptions behind one scenario, all as annual fractions except
/// `unexpected_expenses`, which is the share of each contribution diverted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeAssumptions {
    pub income_growth: f64,
    pub market_return: f64,
    pub unexpected_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeScenarioOutcome {
    pub kind: LifeScenarioKind,
    pub assumptions: LifeAssumptions,
    /// First-month contribution after unexpected expenses
    pub monthly_contribution: f64,
    pub final_amount: f64,
    pub shortfall: f64,
    /// `min(1, final / target)`
    pub funded_ratio: f64,
    pub time_to_goal: TimeToGoal,
}

impl LifeScenarioOutcome {
    pub fn reaches_target(&self) -> bool {
        self.shortfall == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeScenarioAnalysis {
    pub goal_id: String,
    pub months: u32,
    pub target_amount: f64,
    /// In [`LifeScenarioKind::ALL`] order
    pub scenarios: Vec<LifeScenarioOutcome>,
    pub scenarios_reaching_target: usize,
    pub best_case: LifeScenarioKind,
    pub worst_case: LifeScenarioKind,
}

/// Run every [`LifeScenarioKind`] for one goal.
///
/// Time-to-goal searches stop at `max_horizon` months. Ties for best or worst
/// case keep the earlier scenario.
pub fn analyze_life_scenarios(
    goal: &Goal,
    profile: &FinancialProfile,
    as_of: NaiveDate,
    max_horizon: u32,
) -> LifeScenarioAnalysis {
    let months = months_to_goal(goal.deadline(), as_of);
    let base_contribution = monthly_contribution(goal, profile, months);
    let target = goal.target_amount();

    let scenarios: Vec<LifeScenarioOutcome> = LifeScenarioKind::ALL
        .iter()
        .map(|kind| {
            let assumptions = kind.assumptions();
            let contribution = (base_contribution * (1.0 - assumptions.unexpected_expenses)).max(0.0);
            let funding = Funding {
                existing_savings: profile.existing_savings(),
                monthly_contribution: contribution,
                contribution_growth: assumptions.income_growth,
            };
            let final_amount = funding.balance_after(assumptions.market_return, months);

            LifeScenarioOutcome {
                kind: *kind,
                assumptions,
                monthly_contribution: contribution,
                final_amount,
                shortfall: (target - final_amount).max(0.0),
                funded_ratio: (final_amount / target).min(1.0),
                time_to_goal: funding.time_to_reach(assumptions.market_return, target, max_horizon),
            }
        })
        .collect();

    let mut best = &scenarios[0];
    let mut worst = &scenarios[0];
    for outcome in &scenarios[1..] {
        if outcome.final_amount > best.final_amount {
            best = outcome;
        }
        if outcome.final_amount < worst.final_amount {
            worst = outcome;
        }
    }
    let (best_case, worst_case) = (best.kind, worst.kind);
    let reaching = scenarios.iter().filter(|s| s.reaches_target()).count();

    debug!(
        goal_id = %goal.id(),
        months,
        reaching,
        best = %best_case,
        worst = %worst_case,
        "Life scenarios analyzed"
    );

    LifeScenarioAnalysis {
        goal_id: goal.id().to_string(),
        months,
        target_amount: target,
        scenarios,
        scenarios_reaching_target: reaching,
        best_case,
        worst_case,
    }
}
