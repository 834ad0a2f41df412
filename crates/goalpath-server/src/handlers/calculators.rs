//! Calculator handlers

use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;

use crate::{parse_body, AppError};
use goalpath_core::{analyze_credit_score, CreditAnalysis};
use goalpath_core::calculators::{
    investment_return, loan_repayment, retirement, savings_goal, InvestmentInput,
    InvestmentResult, LoanInput, LoanResult, RetirementInput, RetirementResult,
    SavingsGoalInput, SavingsGoalResult,
};

/// POST /api/calculators/savings-goal - Will savings plus contributions reach a target?
pub async fn calc_savings_goal(
    payload: Result<Json<SavingsGoalInput>, JsonRejection>,
) -> Result<Json<SavingsGoalResult>, AppError> {
    let input = parse_body(payload)?;
    Ok(Json(savings_goal(&input)?))
}

/// POST /api/calculators/loan - Monthly instalment and total interest
pub async fn calc_loan(
    payload: Result<Json<LoanInput>, JsonRejection>,
) -> Result<Json<LoanResult>, AppError> {
    let input = parse_body(payload)?;
    Ok(Json(loan_repayment(&input)?))
}

/// POST /api/calculators/investment - Future value with monthly top-ups
pub async fn calc_investment(
    payload: Result<Json<InvestmentInput>, JsonRejection>,
) -> Result<Json<InvestmentResult>, AppError> {
    let input = parse_body(payload)?;
    Ok(Json(investment_return(&input)?))
}

/// POST /api/calculators/retirement - Corpus and monthly savings for retirement
pub async fn calc_retirement(
    payload: Result<Json<RetirementInput>, JsonRejection>,
) -> Result<Json<RetirementResult>, AppError> {
    let input = parse_body(payload)?;
    Ok(Json(retirement(&input)?))
}

#[derive(Debug, Deserialize)]
pub struct CreditHealthRequest {
    pub score: u16,
}

/// POST /api/calculators/credit-health - Health band and actions for a credit score
pub async fn calc_credit_health(
    payload: Result<Json<CreditHealthRequest>, JsonRejection>,
) -> Result<Json<CreditAnalysis>, AppError> {
    let req = parse_body(payload)?;
    Ok(Json(analyze_credit_score(req.score)?))
}
