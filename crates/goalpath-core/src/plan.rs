//! Periodic financial plan
//!
//! Scores every active goal, allocates disposable income in priority order and
//! attaches the plan-level insights (savings rate, expense ratio, one line per
//! funded goal, and an explicit deficit warning).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::allocation::{AllocationAllocator, AllocationPlan, AllocationRequest};
use crate::error::Result;
use crate::insights::Severity;
use crate::models::{FinancialProfile, Goal};
use crate::priority::{PriorityCriteria, PriorityScorer, PriorityUpdate};
use crate::projection::months_to_goal;

/// Savings rate the plan nudges users towards, in percent
const TARGET_SAVINGS_RATE: f64 = 30.0;

/// A goal together with the caller's priority inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanGoal {
    #[serde(flatten)]
    pub goal: Goal,
    #[serde(flatten)]
    pub criteria: PriorityCriteria,
}

impl PlanGoal {
    pub fn new(goal: Goal, criteria: PriorityCriteria) -> Self {
        Self { goal, criteria }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanInsightKind {
    SavingsRate,
    ExpenseTracking,
    GoalProgress,
    Deficit,
}

impl PlanInsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SavingsRate => "savings_rate",
            Self::ExpenseTracking => "expense_tracking",
            Self::GoalProgress => "goal_progress",
            Self::Deficit => "deficit",
        }
    }
}

impl fmt::Display for PlanInsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInsight {
    pub kind: PlanInsightKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    pub message: String,
    pub recommendation: String,
    /// The figure the message is about (percent or amount)
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPlan {
    pub as_of: NaiveDate,
    pub disposable_income: f64,
    pub priorities: Vec<PriorityUpdate>,
    pub allocation: AllocationPlan,
    pub insights: Vec<PlanInsight>,
}

pub struct PlanBuilder;

impl PlanBuilder {
    /// Plan over the active goals only; completed and paused goals are skipped
    pub fn build(profile: &FinancialProfile, goals: &[PlanGoal], as_of: NaiveDate) -> Result<FinancialPlan> {
        let active: Vec<&PlanGoal> = goals.iter().filter(|g| g.goal.is_active()).collect();
        if active.len() < goals.len() {
            debug!(skipped = goals.len() - active.len(), "Skipping inactive goals");
        }

        let priorities: Vec<PriorityUpdate> = active
            .iter()
            .map(|g| PriorityScorer::evaluate(&g.goal, &g.criteria, as_of))
            .collect();

        let requests: Vec<AllocationRequest> = active
            .iter()
            .zip(&priorities)
            .map(|(g, p)| {
                let months = months_to_goal(g.goal.deadline(), as_of);
                AllocationRequest {
                    goal_id: g.goal.id().to_string(),
                    priority_score: p.score,
                    required_monthly_contribution: g.goal.remaining() / f64::from(months),
                }
            })
            .collect();

        let disposable_income = profile.disposable_income();
        let allocation = AllocationAllocator::allocate(disposable_income, &requests)?;
        let insights = plan_insights(profile, &active, &allocation);

        info!(
            goals = active.len(),
            disposable_income,
            committed = allocation.total_committed(),
            "Financial plan built"
        );

        Ok(FinancialPlan {
            as_of,
            disposable_income,
            priorities,
            allocation,
            insights,
        })
    }
}

fn plan_insights(profile: &FinancialProfile, goals: &[&PlanGoal], allocation: &AllocationPlan) -> Vec<PlanInsight> {
    let income = profile.monthly_income();
    let expenses = profile.monthly_expenses();
    let mut insights = Vec::new();

    if let Some(deficit) = allocation.deficit {
        insights.push(PlanInsight {
            kind: PlanInsightKind::Deficit,
            severity: Severity::Warning,
            goal_id: None,
            message: format!("Your expenses exceed your income by {:.2} per month", deficit),
            recommendation: "Reduce expenses before committing to new contributions".to_string(),
            value: deficit,
        });
    } else if profile.disposable_income() <= 0.0 {
        insights.push(PlanInsight {
            kind: PlanInsightKind::Deficit,
            severity: Severity::Warning,
            goal_id: None,
            message: "Your expenses use up your entire income".to_string(),
            recommendation: "Free up part of your income to start saving".to_string(),
            value: 0.0,
        });
    }

    if income > 0.0 {
        let savings_rate = (income - expenses) / income * 100.0;
        insights.push(PlanInsight {
            kind: PlanInsightKind::SavingsRate,
            severity: if savings_rate < TARGET_SAVINGS_RATE {
                Severity::Attention
            } else {
                Severity::Info
            },
            goal_id: None,
            message: format!("Your current savings rate is {:.2}%", savings_rate),
            recommendation: format!("Aim to increase your savings rate to {:.0}%", TARGET_SAVINGS_RATE),
            value: savings_rate,
        });

        let expense_ratio = expenses / income * 100.0;
        insights.push(PlanInsight {
            kind: PlanInsightKind::ExpenseTracking,
            severity: Severity::Info,
            goal_id: None,
            message: format!("Your monthly expenses are {:.2}% of your income", expense_ratio),
            recommendation: "Look for areas to reduce discretionary spending".to_string(),
            value: expense_ratio,
        });
    }

    for entry in &allocation.allocations {
        let title = goals
            .iter()
            .find(|g| g.goal.id() == entry.goal_id)
            .map(|g| g.goal.title())
            .unwrap_or(entry.goal_id.as_str());
        insights.push(PlanInsight {
            kind: PlanInsightKind::GoalProgress,
            severity: Severity::Info,
            goal_id: Some(entry.goal_id.clone()),
            message: format!(
                "Recommended monthly contribution to {}: {:.2}",
                title, entry.recommended_contribution
            ),
            recommendation: "Consistent contributions will help you achieve your goal".to_string(),
            value: entry.recommended_contribution,
        });
    }

    insights
}
