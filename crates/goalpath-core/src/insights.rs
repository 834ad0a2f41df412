//! Insight generation
//!
//! Human-facing figures derived from a projection: the shortfall of the best
//! scenario, the inflation-adjusted target and a simple target-based monthly
//! figure. "Best" here means the highest projected amount, which is not
//! necessarily the optimizer's recommendation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Goal, ProjectionScenario};

/// Default annual inflation for the adjusted target
pub const DEFAULT_INFLATION_RATE: f64 = 0.06;

/// How loudly an insight should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Attention,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A short note attached to a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub severity: Severity,
    pub message: String,
}

/// Figures derived from one goal's projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInsights {
    /// Option with the highest projected amount
    pub best_option: String,
    pub best_projected_amount: f64,
    pub shortfall: f64,
    pub inflation_rate: f64,
    pub inflation_adjusted_target: f64,
    /// `target / months`, independent of the capped contribution
    pub recommended_monthly_contribution: f64,
    /// Set when expenses exceed income
    pub deficit: Option<f64>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl GoalInsights {
    /// Re-derive the figures that depend on projected amounts
    pub fn refresh(&mut self, target_amount: f64, scenarios: &[ProjectionScenario]) {
        if let Some(best) = best_scenario(scenarios) {
            self.best_option = best.option.name().to_string();
            self.best_projected_amount = best.projected_amount;
            self.shortfall = (target_amount - best.projected_amount).max(0.0);
        }
        self.notes.retain(|n| n.severity != Severity::Attention);
        if let Some(note) = unreachable_note(scenarios) {
            self.notes.push(note);
        }
    }
}

/// Scenario with the highest projected amount; ties keep the earlier one
pub fn best_scenario(scenarios: &[ProjectionScenario]) -> Option<&ProjectionScenario> {
    scenarios.iter().fold(None, |best: Option<&ProjectionScenario>, s| match best {
        Some(b) if b.projected_amount >= s.projected_amount => Some(b),
        _ => Some(s),
    })
}

fn unreachable_note(scenarios: &[ProjectionScenario]) -> Option<Note> {
    let first = scenarios.first()?;
    if scenarios.iter().any(|s| s.time_to_goal.is_reachable()) {
        return None;
    }
    Some(Note {
        severity: Severity::Attention,
        message: format!("No option reaches the target: {}", first.time_to_goal),
    })
}

/// Derives [`GoalInsights`] from projection output
#[derive(Debug, Clone, Copy)]
pub struct InsightGenerator {
    inflation_rate: f64,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_INFLATION_RATE)
    }
}

impl InsightGenerator {
    pub fn new(inflation_rate: f64) -> Self {
        Self { inflation_rate }
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    /// `target × (1 + inflation)^(months / 12)`
    pub fn inflation_adjusted_target(&self, target_amount: f64, months: u32) -> f64 {
        target_amount * (1.0 + self.inflation_rate).powf(f64::from(months) / 12.0)
    }

    pub fn generate(
        &self,
        goal: &Goal,
        months: u32,
        scenarios: &[ProjectionScenario],
        disposable_income: f64,
    ) -> GoalInsights {
        let target = goal.target_amount();
        let mut notes = Vec::new();

        let deficit = if disposable_income < 0.0 {
            let deficit = -disposable_income;
            warn!(goal_id = %goal.id(), deficit, "Expenses exceed income");
            notes.push(Note {
                severity: Severity::Warning,
                message: format!(
                    "Expenses exceed income by {:.2} per month; contributions are set to 0",
                    deficit
                ),
            });
            Some(deficit)
        } else {
            if disposable_income == 0.0 {
                warn!(goal_id = %goal.id(), "No disposable income for goal contributions");
                notes.push(Note {
                    severity: Severity::Warning,
                    message: "Expenses use up your entire income; contributions are set to 0".to_string(),
                });
            }
            None
        };

        let mut insights = GoalInsights {
            best_option: String::new(),
            best_projected_amount: 0.0,
            shortfall: goal.remaining(),
            inflation_rate: self.inflation_rate,
            inflation_adjusted_target: self.inflation_adjusted_target(target, months),
            recommended_monthly_contribution: target / f64::from(months.max(1)),
            deficit,
            notes,
        };
        insights.refresh(target, scenarios);
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvestmentOption, TimeToGoal};
    use chrono::NaiveDate;

    fn goal() -> Goal {
        Goal::new(
            "g1",
            "Wedding",
            12_000.0,
            0.0,
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        )
        .unwrap()
    }

    fn scenario(name: &str, index: usize, projected: f64, reached: bool) -> ProjectionScenario {
        ProjectionScenario {
            option: InvestmentOption::new(name, 0.05, 0.5, 0.5).unwrap(),
            catalog_index: index,
            horizon_months: 12,
            monthly_contribution: 500.0,
            projected_amount: projected,
            time_to_goal: if reached {
                TimeToGoal::Reached { months: 10 }
            } else {
                TimeToGoal::Unreachable { horizon_months: 600 }
            },
            optimization_score: None,
        }
    }

    #[test]
    fn test_shortfall_uses_highest_projection() {
        let scenarios = vec![
            scenario("A", 0, 8_000.0, true),
            scenario("B", 1, 10_000.0, true),
            scenario("C", 2, 10_000.0, true),
        ];
        let insights = InsightGenerator::default().generate(&goal(), 12, &scenarios, 2000.0);

        assert_eq!(insights.best_option, "B");
        assert_eq!(insights.shortfall, 2_000.0);
        assert_eq!(insights.recommended_monthly_contribution, 1_000.0);
        assert!(insights.deficit.is_none());
    }

    #[test]
    fn test_shortfall_never_negative() {
        let scenarios = vec![scenario("A", 0, 15_000.0, true)];
        let insights = InsightGenerator::default().generate(&goal(), 12, &scenarios, 2000.0);
        assert_eq!(insights.shortfall, 0.0);
    }

    #[test]
    fn test_inflation_adjusted_target() {
        let generator = InsightGenerator::default();
        let adjusted = generator.inflation_adjusted_target(10_000.0, 24);
        assert!((adjusted - 11_236.0).abs() < 1e-6);
        assert_eq!(generator.inflation_adjusted_target(10_000.0, 0), 10_000.0);
    }

    #[test]
    fn test_deficit_is_surfaced() {
        let scenarios = vec![scenario("A", 0, 0.0, false)];
        let insights = InsightGenerator::default().generate(&goal(), 12, &scenarios, -750.0);

        assert_eq!(insights.deficit, Some(750.0));
        assert!(insights.notes.iter().any(|n| n.severity == Severity::Warning));
        assert!(insights.notes.iter().any(|n| n.severity == Severity::Attention));
    }

    #[test]
    fn test_zero_disposable_income_has_no_deficit() {
        let scenarios = vec![scenario("A", 0, 0.0, false)];
        let insights = InsightGenerator::default().generate(&goal(), 12, &scenarios, 0.0);

        assert_eq!(insights.deficit, None);
        let warning = insights
            .notes
            .iter()
            .find(|n| n.severity == Severity::Warning)
            .unwrap();
        assert!(warning.message.contains("entire income"));
        assert!(!warning.message.contains("-0.00"));

        let json = serde_json::to_value(&insights).unwrap();
        assert!(json["deficit"].is_null());
    }

    #[test]
    fn test_refresh_replaces_unreachable_note() {
        let mut insights =
            InsightGenerator::default().generate(&goal(), 12, &[scenario("A", 0, 0.0, false)], 100.0);
        assert_eq!(insights.notes.len(), 1);

        insights.refresh(12_000.0, &[scenario("A", 0, 12_500.0, true)]);
        assert!(insights.notes.is_empty());
        assert_eq!(insights.shortfall, 0.0);
    }
}
