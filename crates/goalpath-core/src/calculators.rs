//! Standalone financial calculators
//!
//! Rates are fractions (`0.08` for 8%). All calculators reject zero horizons
//! and negative amounts.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, Error, Result};
use crate::projection::compound;

/// Assumed life expectancy for retirement planning
pub const LIFE_EXPECTANCY: u32 = 85;

/// Inflation applied to desired retirement income
pub const RETIREMENT_INFLATION: f64 = 0.06;

fn ensure_positive_horizon(field: &str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(Error::invalid(format!("{} must be > 0", field)));
    }
    Ok(value)
}

fn ensure_rate(field: &str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value <= -1.0 {
        return Err(Error::invalid(format!("{} must be > -1 (got {})", field, value)));
    }
    Ok(value)
}

// ============================================================================
// Savings goal
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalInput {
    pub target_amount: f64,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    pub annual_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalResult {
    pub future_value: f64,
    pub shortfall: f64,
    /// Extra monthly amount that would close the shortfall (ignores growth)
    pub monthly_contribution_needed: f64,
    /// `min(1, future_value / target)`
    pub achievement_probability: f64,
}

pub fn savings_goal(input: &SavingsGoalInput) -> Result<SavingsGoalResult> {
    let target = ensure_non_negative("target_amount", input.target_amount)?;
    if target == 0.0 {
        return Err(Error::invalid("target_amount must be > 0"));
    }
    let savings = ensure_non_negative("current_savings", input.current_savings)?;
    let contribution = ensure_non_negative("monthly_contribution", input.monthly_contribution)?;
    let rate = ensure_rate("annual_rate", input.annual_rate)?;
    let months = ensure_positive_horizon("years", input.years)? * 12;

    let future_value = compound(savings, contribution, rate, months);
    let shortfall = (target - future_value).max(0.0);

    Ok(SavingsGoalResult {
        future_value,
        shortfall,
        monthly_contribution_needed: shortfall / f64::from(months),
        achievement_probability: (future_value / target).min(1.0),
    })
}

// ============================================================================
// Loan repayment
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: f64,
    pub annual_rate: f64,
    pub tenure_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    /// Interest as a percentage of principal
    pub interest_percentage: f64,
}

/// Equated monthly instalment; `P / n` when the rate is 0
pub fn loan_repayment(input: &LoanInput) -> Result<LoanResult> {
    let principal = ensure_non_negative("principal", input.principal)?;
    if principal == 0.0 {
        return Err(Error::invalid("principal must be > 0"));
    }
    let rate = ensure_non_negative("annual_rate", input.annual_rate)?;
    let n = f64::from(ensure_positive_horizon("tenure_months", input.tenure_months)?);

    let r = rate / 12.0;
    let monthly_payment = if r == 0.0 {
        principal / n
    } else {
        let growth = (1.0 + r).powf(n);
        principal * r * growth / (growth - 1.0)
    };

    let total_payment = monthly_payment * n;
    let total_interest = total_payment - principal;

    Ok(LoanResult {
        monthly_payment,
        total_payment,
        total_interest,
        interest_percentage: total_interest / principal * 100.0,
    })
}

// ============================================================================
// Investment return
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInput {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub annual_return: f64,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub future_value: f64,
    pub total_contribution: f64,
    pub total_gains: f64,
}

pub fn investment_return(input: &InvestmentInput) -> Result<InvestmentResult> {
    let principal = ensure_non_negative("principal", input.principal)?;
    let contribution = ensure_non_negative("monthly_contribution", input.monthly_contribution)?;
    let rate = ensure_rate("annual_return", input.annual_return)?;
    let months = ensure_positive_horizon("years", input.years)? * 12;

    let future_value = compound(principal, contribution, rate, months);
    let total_contribution = principal + contribution * f64::from(months);

    Ok(InvestmentResult {
        future_value,
        total_contribution,
        total_gains: future_value - total_contribution,
    })
}

// ============================================================================
// Retirement
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_annual_income: f64,
    pub desired_annual_income: f64,
    pub current_savings: f64,
    pub expected_annual_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementResult {
    pub years_to_retirement: u32,
    pub retirement_years: u32,
    /// Desired income in money of the retirement year
    pub inflation_adjusted_income: f64,
    pub required_corpus: f64,
    pub monthly_contribution_needed: f64,
    pub shortfall: f64,
    /// Adjusted desired income as a percentage of current income (0 without income)
    pub income_adequacy: f64,
}

pub fn retirement(input: &RetirementInput) -> Result<RetirementResult> {
    if input.retirement_age <= input.current_age {
        return Err(Error::invalid("retirement_age must be greater than current_age"));
    }
    if input.retirement_age >= LIFE_EXPECTANCY {
        return Err(Error::invalid(format!(
            "retirement_age must be below {}",
            LIFE_EXPECTANCY
        )));
    }
    let current_income = ensure_non_negative("current_annual_income", input.current_annual_income)?;
    let desired = ensure_non_negative("desired_annual_income", input.desired_annual_income)?;
    let savings = ensure_non_negative("current_savings", input.current_savings)?;
    let rate = ensure_non_negative("expected_annual_return", input.expected_annual_return)?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let retirement_years = LIFE_EXPECTANCY - input.retirement_age;

    let adjusted = desired * (1.0 + RETIREMENT_INFLATION).powi(years_to_retirement as i32);
    let required_corpus = if rate == 0.0 {
        adjusted * f64::from(retirement_years)
    } else {
        adjusted * f64::from(retirement_years) / rate
    };
    let shortfall = (required_corpus - savings).max(0.0);

    Ok(RetirementResult {
        years_to_retirement,
        retirement_years,
        inflation_adjusted_income: adjusted,
        required_corpus,
        monthly_contribution_needed: shortfall / f64::from(years_to_retirement * 12),
        shortfall,
        income_adequacy: if current_income > 0.0 {
            adjusted / current_income * 100.0
        } else {
            0.0
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_goal() {
        let result = savings_goal(&SavingsGoalInput {
            target_amount: 30_000.0,
            current_savings: 0.0,
            monthly_contribution: 1_000.0,
            years: 2,
            annual_rate: 0.06,
        })
        .unwrap();

        assert!((result.future_value - 25_431.96).abs() < 0.01);
        assert!((result.shortfall - 4_568.04).abs() < 0.01);
        assert!((result.monthly_contribution_needed - result.shortfall / 24.0).abs() < 1e-9);
        assert!(result.achievement_probability < 1.0);
    }

    #[test]
    fn test_savings_goal_met() {
        let result = savings_goal(&SavingsGoalInput {
            target_amount: 1_000.0,
            current_savings: 2_000.0,
            monthly_contribution: 0.0,
            years: 1,
            annual_rate: 0.0,
        })
        .unwrap();
        assert_eq!(result.shortfall, 0.0);
        assert_eq!(result.achievement_probability, 1.0);
    }

    #[test]
    fn test_loan_emi() {
        let result = loan_repayment(&LoanInput {
            principal: 100_000.0,
            annual_rate: 0.12,
            tenure_months: 12,
        })
        .unwrap();
        assert!((result.monthly_payment - 8_884.88).abs() < 0.01);
        assert!(result.total_interest > 0.0);
    }

    #[test]
    fn test_loan_zero_rate_is_linear() {
        let result = loan_repayment(&LoanInput {
            principal: 12_000.0,
            annual_rate: 0.0,
            tenure_months: 12,
        })
        .unwrap();
        assert_eq!(result.monthly_payment, 1_000.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_investment_return() {
        let result = investment_return(&InvestmentInput {
            principal: 10_000.0,
            monthly_contribution: 0.0,
            annual_return: 0.12,
            years: 1,
        })
        .unwrap();
        assert!((result.future_value - 11_268.25).abs() < 0.01);
        assert_eq!(result.total_contribution, 10_000.0);
        assert!((result.total_gains - 1_268.25).abs() < 0.01);
    }

    #[test]
    fn test_retirement() {
        let result = retirement(&RetirementInput {
            current_age: 35,
            retirement_age: 60,
            current_annual_income: 1_200_000.0,
            desired_annual_income: 600_000.0,
            current_savings: 500_000.0,
            expected_annual_return: 0.08,
        })
        .unwrap();

        assert_eq!(result.years_to_retirement, 25);
        assert_eq!(result.retirement_years, 25);
        let adjusted = 600_000.0 * 1.06f64.powi(25);
        assert!((result.inflation_adjusted_income - adjusted).abs() < 1e-6);
        assert!((result.required_corpus - adjusted * 25.0 / 0.08).abs() < 1e-3);
        assert!(result.monthly_contribution_needed > 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(loan_repayment(&LoanInput {
            principal: 1_000.0,
            annual_rate: 0.1,
            tenure_months: 0,
        })
        .is_err());
        assert!(investment_return(&InvestmentInput {
            principal: -1.0,
            monthly_contribution: 0.0,
            annual_return: 0.1,
            years: 1,
        })
        .is_err());
        assert!(retirement(&RetirementInput {
            current_age: 60,
            retirement_age: 55,
            current_annual_income: 1.0,
            desired_annual_income: 1.0,
            current_savings: 0.0,
            expected_annual_return: 0.05,
        })
        .is_err());
    }
}
