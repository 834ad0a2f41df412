//! Test utilities for goalpath-core
//!
//! Fixed dates and a small household used across unit, integration and
//! server tests.

use chrono::NaiveDate;

use crate::models::{FinancialProfile, Goal, RiskTolerance};
use crate::plan::PlanGoal;
use crate::priority::PriorityCriteria;

/// The reference "today" used by fixtures
pub fn as_of() -> NaiveDate {
    date(2026, 1, 1)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid fixture date {}-{}-{}", year, month, day),
    }
}

/// Income 50000, expenses 45000, 10000 saved, medium risk
pub fn sample_profile() -> FinancialProfile {
    FinancialProfile::new(50_000.0, 45_000.0, 10_000.0, RiskTolerance::Medium, 32)
        .unwrap_or_else(|e| panic!("fixture profile: {}", e))
}

pub fn goal(id: &str, target: f64, current: f64, deadline: NaiveDate) -> Goal {
    Goal::new(id, id.replace('-', " "), target, current, deadline)
        .unwrap_or_else(|e| panic!("fixture goal {}: {}", id, e))
}

/// Three goals: an urgent home deposit, a car and a long-range education fund
pub fn sample_goals() -> Vec<PlanGoal> {
    let criteria = |v: f64| {
        PriorityCriteria::new(v).unwrap_or_else(|e| panic!("fixture criteria: {}", e))
    };
    vec![
        PlanGoal::new(goal("home-deposit", 240_000.0, 20_000.0, date(2027, 1, 1)), criteria(0.9)),
        PlanGoal::new(goal("car", 60_000.0, 15_000.0, date(2028, 1, 1)), criteria(0.4)),
        PlanGoal::new(goal("education", 500_000.0, 0.0, date(2036, 1, 1)), criteria(0.7)),
    ]
}
