//! Profile building
//!
//! Turns partial, collaborator-supplied figures into a complete
//! [`FinancialProfile`]. Missing expenses are estimated, savings are summed
//! from aggregated balances and the risk tolerance falls back to an age and
//! income heuristic. Explicit overrides always win.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_non_negative, Result};
use crate::models::{FinancialProfile, RiskTolerance};

/// Expenses estimated as this share of income when none are given
pub const ESTIMATED_EXPENSE_SHARE: f64 = 0.6;

/// Age assumed when the raw profile has none
pub const DEFAULT_AGE: u32 = 30;

/// Partial profile as supplied by account aggregation or a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub risk_tolerance: Option<RiskTolerance>,
    /// Current balances of linked bank accounts
    #[serde(default)]
    pub bank_balances: Vec<f64>,
    /// Current values of linked investments
    #[serde(default)]
    pub investment_values: Vec<f64>,
}

/// Values that replace anything computed by the builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub existing_savings: Option<f64>,
    #[serde(default)]
    pub risk_tolerance: Option<RiskTolerance>,
    #[serde(default)]
    pub age: Option<u32>,
}

pub struct ProfileBuilder;

impl ProfileBuilder {
    pub fn build(raw: &RawProfile, overrides: &ProfileOverrides) -> Result<FinancialProfile> {
        let monthly_income = overrides.monthly_income.unwrap_or(raw.monthly_income);
        let monthly_income = ensure_non_negative("monthly_income", monthly_income)?;

        let monthly_expenses = match overrides.monthly_expenses.or(raw.monthly_expenses) {
            Some(expenses) => expenses,
            None => {
                let estimate = monthly_income * ESTIMATED_EXPENSE_SHARE;
                debug!(monthly_income, estimate, "Estimating monthly expenses");
                estimate
            }
        };

        let existing_savings = match overrides.existing_savings {
            Some(savings) => savings,
            None => Self::aggregate_savings(raw)?,
        };

        let age = overrides.age.or(raw.age).unwrap_or(DEFAULT_AGE);

        let risk_tolerance = match overrides.risk_tolerance.or(raw.risk_tolerance) {
            Some(risk) => risk,
            None => {
                let risk = Self::infer_risk_tolerance(age, monthly_income);
                debug!(age, monthly_income, risk = risk.as_str(), "Inferred risk tolerance");
                risk
            }
        };

        FinancialProfile::new(
            monthly_income,
            monthly_expenses,
            existing_savings,
            risk_tolerance,
            age,
        )
    }

    /// Sum of bank balances and investment values; empty lists sum to 0
    pub fn aggregate_savings(raw: &RawProfile) -> Result<f64> {
        let mut total = 0.0;
        for balance in &raw.bank_balances {
            total += ensure_non_negative("bank_balance", *balance)?;
        }
        for value in &raw.investment_values {
            total += ensure_non_negative("investment_value", *value)?;
        }
        Ok(total)
    }

    /// Fallback heuristic, used only when no tolerance is supplied
    pub fn infer_risk_tolerance(age: u32, monthly_income: f64) -> RiskTolerance {
        if age < 30 && monthly_income > 100_000.0 {
            RiskTolerance::High
        } else if age < 45 && monthly_income > 50_000.0 {
            RiskTolerance::Medium
        } else {
            RiskTolerance::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expenses_estimated_from_income() {
        let raw = RawProfile {
            monthly_income: 10_000.0,
            ..Default::default()
        };
        let profile = ProfileBuilder::build(&raw, &ProfileOverrides::default()).unwrap();
        assert_eq!(profile.monthly_expenses(), 6_000.0);
        assert_eq!(profile.existing_savings(), 0.0);
        assert_eq!(profile.age(), DEFAULT_AGE);
    }

    #[test]
    fn test_savings_aggregated() {
        let raw = RawProfile {
            monthly_income: 10_000.0,
            monthly_expenses: Some(4_000.0),
            bank_balances: vec![1_000.0, 2_500.0],
            investment_values: vec![10_000.0],
            ..Default::default()
        };
        let profile = ProfileBuilder::build(&raw, &ProfileOverrides::default()).unwrap();
        assert_eq!(profile.existing_savings(), 13_500.0);
        assert_eq!(profile.monthly_expenses(), 4_000.0);
    }

    #[test]
    fn test_risk_heuristic() {
        assert_eq!(ProfileBuilder::infer_risk_tolerance(25, 150_000.0), RiskTolerance::High);
        assert_eq!(ProfileBuilder::infer_risk_tolerance(25, 80_000.0), RiskTolerance::Medium);
        assert_eq!(ProfileBuilder::infer_risk_tolerance(40, 150_000.0), RiskTolerance::Medium);
        assert_eq!(ProfileBuilder::infer_risk_tolerance(45, 150_000.0), RiskTolerance::Low);
        assert_eq!(ProfileBuilder::infer_risk_tolerance(25, 50_000.0), RiskTolerance::Low);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let raw = RawProfile {
            monthly_income: 200_000.0,
            monthly_expenses: Some(50_000.0),
            age: Some(25),
            bank_balances: vec![1_000.0],
            ..Default::default()
        };
        let overrides = ProfileOverrides {
            monthly_expenses: Some(70_000.0),
            existing_savings: Some(99.0),
            risk_tolerance: Some(RiskTolerance::Low),
            ..Default::default()
        };
        let profile = ProfileBuilder::build(&raw, &overrides).unwrap();
        assert_eq!(profile.monthly_expenses(), 70_000.0);
        assert_eq!(profile.existing_savings(), 99.0);
        assert_eq!(profile.risk_tolerance(), RiskTolerance::Low);
    }

    #[test]
    fn test_explicit_tolerance_skips_heuristic() {
        let raw = RawProfile {
            monthly_income: 1_000.0,
            risk_tolerance: Some(RiskTolerance::High),
            ..Default::default()
        };
        let profile = ProfileBuilder::build(&raw, &ProfileOverrides::default()).unwrap();
        assert_eq!(profile.risk_tolerance(), RiskTolerance::High);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let raw = RawProfile {
            monthly_income: 1_000.0,
            bank_balances: vec![-5.0],
            ..Default::default()
        };
        assert!(ProfileBuilder::build(&raw, &ProfileOverrides::default()).is_err());

        let raw = RawProfile {
            monthly_income: -1.0,
            ..Default::default()
        };
        assert!(ProfileBuilder::build(&raw, &ProfileOverrides::default()).is_err());
    }
}
