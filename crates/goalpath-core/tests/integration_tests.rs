//! Integration tests for goalpath-core
//!
//! These tests exercise the full profile → projection → plan → milestones
//! workflow through the public API.

use chrono::NaiveDate;
use goalpath_core::{
    export, simulate, AdjustmentPipeline, EducationLevel, EngineConfig, FinancialProfile, Goal,
    IncomeGrowth, MilestoneTracker, NotifiedMilestones, PlanBuilder, PlanGoal, PriorityCriteria,
    ProfileBuilder, ProfileOverrides, ProjectionEngine, RawProfile, RefreshedBalances,
    RiskTolerance, SimulationConfig, TimeToGoal,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn as_of() -> NaiveDate {
    date(2026, 1, 1)
}

/// Aggregated accounts for a mid-career household
fn raw_profile() -> RawProfile {
    RawProfile {
        monthly_income: 60_000.0,
        monthly_expenses: Some(42_000.0),
        age: Some(38),
        risk_tolerance: None,
        bank_balances: vec![25_000.0, 5_000.0],
        investment_values: vec![70_000.0],
    }
}

// =============================================================================
// Projection Workflow
// =============================================================================

#[test]
fn test_profile_to_projection() {
    let profile = ProfileBuilder::build(&raw_profile(), &ProfileOverrides::default())
        .expect("Failed to build profile");
    assert_eq!(profile.existing_savings(), 100_000.0);
    assert_eq!(profile.risk_tolerance(), RiskTolerance::Medium);

    let config = EngineConfig::default();
    let engine = ProjectionEngine::from_config(&config);
    let goal = Goal::new("home", "Home deposit", 400_000.0, 0.0, date(2029, 1, 1))
        .expect("Failed to create goal");

    let result = engine
        .project(&goal, &profile, as_of())
        .expect("Failed to project");

    assert_eq!(result.months_to_goal, 36);
    assert_eq!(result.scenarios.len(), config.catalog.len());
    // disposable 18000, cap 5400, required 400000/36
    assert_eq!(result.monthly_contribution(), 5_400.0);

    // Scenarios are in catalog order and each one was scored
    for (i, scenario) in result.scenarios.iter().enumerate() {
        assert_eq!(scenario.catalog_index, i);
        assert!(scenario.optimization_score.is_some());
    }

    // Highest projection comes from the highest-return option
    assert_eq!(result.insights.best_option, "Cryptocurrency");
    assert!(result.insights.inflation_adjusted_target > goal.target_amount());
    assert!((result.insights.recommended_monthly_contribution - 400_000.0 / 36.0).abs() < 1e-9);
}

#[test]
fn test_concrete_compound_case() {
    let engine = ProjectionEngine::from_config(&EngineConfig::default());
    let goal = Goal::new("fund", "Fund", 100_000.0, 0.0, date(2028, 1, 1)).unwrap();
    // disposable 1000/0.3 so the cap is exactly 1000
    let profile =
        FinancialProfile::new(10_000.0 / 3.0, 0.0, 0.0, RiskTolerance::Low, 30).unwrap();

    let scenarios = engine.generate_scenarios(&goal, &profile, as_of()).unwrap();
    let fixed_deposits = scenarios
        .iter()
        .find(|s| s.option.name() == "Fixed Deposits")
        .expect("Fixed Deposits in default catalog");

    assert!((fixed_deposits.monthly_contribution - 1_000.0).abs() < 1e-9);
    assert!((fixed_deposits.projected_amount - 25_431.96).abs() < 0.01);
}

#[test]
fn test_past_due_goal_projects_over_one_month() {
    let engine = ProjectionEngine::from_config(&EngineConfig::default());
    let goal = Goal::new("late", "Late", 10_000.0, 2_000.0, date(2024, 6, 1)).unwrap();
    let profile = FinancialProfile::new(5_000.0, 3_000.0, 0.0, RiskTolerance::Low, 50).unwrap();

    let result = engine.project(&goal, &profile, as_of()).unwrap();
    assert_eq!(result.months_to_goal, 1);
    assert_eq!(result.monthly_contribution(), 600.0);
}

#[test]
fn test_unreachable_goal_is_flagged() {
    let engine = ProjectionEngine::from_config(&EngineConfig::default());
    let goal = Goal::new("moon", "Moon", 1_000_000_000.0, 0.0, date(2027, 1, 1)).unwrap();
    let profile = FinancialProfile::new(2_000.0, 1_900.0, 0.0, RiskTolerance::Low, 50).unwrap();

    let result = engine.project(&goal, &profile, as_of()).unwrap();
    assert!(result
        .scenarios
        .iter()
        .all(|s| s.time_to_goal == TimeToGoal::Unreachable { horizon_months: 600 }));
    assert!(!result.insights.notes.is_empty());
}

#[test]
fn test_deficit_projection() {
    let engine = ProjectionEngine::from_config(&EngineConfig::default());
    let goal = Goal::new("trip", "Trip", 5_000.0, 0.0, date(2027, 1, 1)).unwrap();
    let profile = FinancialProfile::new(3_000.0, 3_500.0, 0.0, RiskTolerance::Low, 50).unwrap();

    let result = engine.project(&goal, &profile, as_of()).unwrap();
    assert_eq!(result.monthly_contribution(), 0.0);
    assert_eq!(result.insights.deficit, Some(500.0));
}

#[test]
fn test_adjusted_projection() {
    let profile = ProfileBuilder::build(&raw_profile(), &ProfileOverrides::default()).unwrap();
    let engine = ProjectionEngine::from_config(&EngineConfig::default());
    let goal = Goal::new("home", "Home deposit", 400_000.0, 0.0, date(2031, 1, 1)).unwrap();

    let base = engine.project(&goal, &profile, as_of()).unwrap();
    let pipeline = AdjustmentPipeline::new()
        .with(RefreshedBalances::new(120_000.0).unwrap())
        .with(IncomeGrowth::new(EducationLevel::Postgraduate));
    let adjusted = pipeline.apply(base.clone()).unwrap();

    assert_eq!(adjusted.adjustments, vec!["refreshed_balances", "income_growth"]);
    for (before, after) in base.scenarios.iter().zip(&adjusted.scenarios) {
        assert!(after.projected_amount > before.projected_amount);
    }
    assert!(adjusted.insights.shortfall <= base.insights.shortfall);
}

// =============================================================================
// Plan Workflow
// =============================================================================

#[test]
fn test_plan_workflow() {
    let profile = FinancialProfile::new(50_000.0, 45_000.0, 0.0, RiskTolerance::Medium, 35).unwrap();
    let goals = vec![
        PlanGoal::new(
            Goal::new("house", "House", 240_000.0, 0.0, date(2027, 1, 1)).unwrap(),
            PriorityCriteria::new(1.0).unwrap(),
        ),
        PlanGoal::new(
            Goal::new("car", "Car", 300_000.0, 0.0, date(2031, 1, 1)).unwrap(),
            PriorityCriteria::new(0.2).unwrap(),
        ),
    ];

    let plan = PlanBuilder::build(&profile, &goals, as_of()).expect("Failed to build plan");

    assert_eq!(plan.priorities.len(), 2);
    assert_eq!(plan.allocation.allocations[0].goal_id, "house");
    assert_eq!(plan.allocation.allocations[0].recommended_contribution, 1_500.0);
    assert!((plan.allocation.allocations[1].recommended_contribution - 1_050.0).abs() < 1e-9);
    assert!((plan.allocation.emergency_reserve - 490.0).abs() < 1e-9);
    assert!(plan.allocation.total_committed() <= plan.disposable_income);

    let json = serde_json::to_value(&plan).expect("plan serializes");
    assert_eq!(json["priorities"][0]["goal_id"], "house");
}

// =============================================================================
// Milestone Workflow
// =============================================================================

#[test]
fn test_milestones_across_contributions() {
    let tracker = MilestoneTracker::new(EngineConfig::default().milestones);
    let mut notified = NotifiedMilestones::new();
    let goal = Goal::new("bike", "Bike", 2_000.0, 200.0, date(2026, 12, 1)).unwrap();

    assert!(tracker.evaluate(&goal, &notified).is_empty());

    let goal = goal.with_current_amount(1_100.0).unwrap();
    let events = tracker.evaluate(&goal, &notified);
    assert_eq!(events.iter().map(|e| e.percentage).collect::<Vec<_>>(), vec![25, 50]);
    notified.record(&events);

    let goal = goal.with_current_amount(2_000.0).unwrap();
    let events = tracker.evaluate(&goal, &notified);
    assert_eq!(events.iter().map(|e| e.percentage).collect::<Vec<_>>(), vec![75]);
    assert!(!goal.is_active());
}

// =============================================================================
// Simulation and Export
// =============================================================================

#[test]
fn test_simulation_is_reproducible() {
    let config = EngineConfig::default();
    let option = config.option_by_name("Mutual Funds").expect("default option");
    let goal = Goal::new("home", "Home", 150_000.0, 0.0, date(2030, 1, 1)).unwrap();
    let profile = FinancialProfile::new(20_000.0, 12_000.0, 10_000.0, RiskTolerance::High, 29).unwrap();
    let sim = SimulationConfig::from_settings(&config.simulation).with_iterations(300);

    let a = simulate(&goal, &profile, option, &sim, as_of()).unwrap();
    let b = simulate(&goal, &profile, option, &sim, as_of()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.seed, config.simulation.default_seed);
}

#[test]
fn test_schedule_export() {
    let engine = ProjectionEngine::from_config(&EngineConfig::default());
    let goal = Goal::new("car", "Car", 30_000.0, 0.0, date(2026, 7, 1)).unwrap();
    let profile = FinancialProfile::new(10_000.0, 5_000.0, 1_000.0, RiskTolerance::Low, 40).unwrap();

    let rows = engine.growth_schedule(&goal, &profile, as_of()).unwrap();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("schedule.csv");
    let file = std::fs::File::create(&path).expect("create csv");
    export::write_schedule_csv(&rows, file).expect("write csv");

    let content = std::fs::read_to_string(&path).expect("read csv");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "month,option,balance");
    assert_eq!(lines.len(), 1 + 6 * 6);
    assert!(lines[1].starts_with("1,Savings Account,"));
}
