//! Calculator command implementations (savings, loan, invest, retire, credit)

use anyhow::Result;
use goalpath_core::analyze_credit_score;
use goalpath_core::calculators::{
    investment_return, loan_repayment, retirement, savings_goal, InvestmentInput, LoanInput,
    RetirementInput, SavingsGoalInput,
};

use super::print_json;

pub fn cmd_calc_savings(
    target: f64,
    current: f64,
    monthly: f64,
    years: u32,
    rate: f64,
    json: bool,
) -> Result<()> {
    let result = savings_goal(&SavingsGoalInput {
        target_amount: target,
        current_savings: current,
        monthly_contribution: monthly,
        years,
        annual_rate: rate,
    })?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("🐷 Savings Goal");
    println!("   Future value:        {:>12.2}", result.future_value);
    println!("   Shortfall:           {:>12.2}", result.shortfall);
    println!("   Needed per month:    {:>12.2}", result.monthly_contribution_needed);
    println!(
        "   Achievement:         {:>11.1}%",
        result.achievement_probability * 100.0
    );
    println!();
    Ok(())
}

pub fn cmd_calc_loan(principal: f64, rate: f64, months: u32, json: bool) -> Result<()> {
    let result = loan_repayment(&LoanInput {
        principal,
        annual_rate: rate,
        tenure_months: months,
    })?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("🏦 Loan Repayment");
    println!("   Monthly payment:     {:>12.2}", result.monthly_payment);
    println!("   Total payment:       {:>12.2}", result.total_payment);
    println!("   Total interest:      {:>12.2}", result.total_interest);
    println!("   Interest share:      {:>11.1}%", result.interest_percentage);
    println!();
    Ok(())
}

pub fn cmd_calc_invest(principal: f64, monthly: f64, rate: f64, years: u32, json: bool) -> Result<()> {
    let result = investment_return(&InvestmentInput {
        principal,
        monthly_contribution: monthly,
        annual_return: rate,
        years,
    })?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("📈 Investment Return");
    println!("   Future value:        {:>12.2}", result.future_value);
    println!("   Total contributed:   {:>12.2}", result.total_contribution);
    println!("   Total gains:         {:>12.2}", result.total_gains);
    println!();
    Ok(())
}

pub fn cmd_calc_retire(
    age: u32,
    retire_at: u32,
    income: f64,
    desired: f64,
    savings: f64,
    rate: f64,
    json: bool,
) -> Result<()> {
    let result = retirement(&RetirementInput {
        current_age: age,
        retirement_age: retire_at,
        current_annual_income: income,
        desired_annual_income: desired,
        current_savings: savings,
        expected_annual_return: rate,
    })?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("🏖️  Retirement");
    println!(
        "   Years to retirement: {:>12}   Years in retirement: {}",
        result.years_to_retirement, result.retirement_years
    );
    println!("   Income needed:       {:>12.2}/yr", result.inflation_adjusted_income);
    println!("   Required corpus:     {:>12.2}", result.required_corpus);
    println!("   Save per month:      {:>12.2}", result.monthly_contribution_needed);
    println!("   Shortfall:           {:>12.2}", result.shortfall);
    println!("   Income adequacy:     {:>11.1}%", result.income_adequacy);
    println!();
    Ok(())
}

pub fn cmd_calc_credit(score: u16, json: bool) -> Result<()> {
    let analysis = analyze_credit_score(score)?;

    if json {
        return print_json(&analysis);
    }

    println!();
    println!("💳 Credit Health");
    println!("   Score:               {:>12}", analysis.score);
    println!("   Health:              {:>12}", analysis.health);
    for action in &analysis.recommended_actions {
        println!("   • {}", action);
    }
    println!();
    Ok(())
}
