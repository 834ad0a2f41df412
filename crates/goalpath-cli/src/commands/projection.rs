//! Projection command implementations (project, simulate, scenarios, schedule)

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use goalpath_core::{
    analyze_life_scenarios, export, simulate, AdjustmentPipeline, EducationLevel, ExportFormat, IncomeGrowth,
    ProjectionEngine, ProjectionResult, RefreshedBalances, SimulationConfig,
};

use super::{load_plan_file, print_json, truncate, Ctx};

/// Project one goal across the catalog, optionally through adjustments
pub fn cmd_project(
    ctx: &Ctx,
    file: &Path,
    goal_id: &str,
    refreshed_savings: Option<f64>,
    education: Option<EducationLevel>,
) -> Result<()> {
    let plan = load_plan_file(file)?;
    let profile = plan.build_profile()?;
    let goal = plan.find_goal(goal_id)?;

    let engine = ProjectionEngine::from_config(&ctx.config);
    let mut result = engine
        .project(goal, &profile, ctx.as_of)
        .with_context(|| format!("Failed to project goal '{}'", goal_id))?;

    let mut pipeline = AdjustmentPipeline::new();
    if let Some(savings) = refreshed_savings {
        pipeline.register(Box::new(RefreshedBalances::new(savings)?));
    }
    if let Some(level) = education {
        pipeline.register(Box::new(IncomeGrowth::new(level)));
    }
    if !pipeline.is_empty() {
        result = pipeline.apply(result)?;
    }

    if ctx.json {
        return print_json(&result);
    }

    print_projection(goal.title(), &result);
    Ok(())
}

fn print_projection(title: &str, result: &ProjectionResult) {
    println!();
    println!("🎯 {} ({})", title, result.goal_id);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Target:               {:>12.2}", result.target_amount);
    println!("   Months to deadline:   {:>12}", result.months_to_goal);
    println!("   Existing savings:     {:>12.2}", result.funding.existing_savings);
    println!("   Monthly contribution: {:>12.2}", result.monthly_contribution());
    if result.funding.contribution_growth > 0.0 {
        println!(
            "   Yearly step-up:       {:>11.1}%",
            result.funding.contribution_growth * 100.0
        );
    }
    if !result.adjustments.is_empty() {
        println!("   Adjustments:          {}", result.adjustments.join(", "));
    }

    println!();
    println!(
        "   {:<24} {:>14} {:>8}  {}",
        "Option", "Projected", "Score", "Time to goal"
    );
    for scenario in &result.scenarios {
        let marker = if scenario.catalog_index == result.recommended_strategy.catalog_index {
            "⭐"
        } else {
            "  "
        };
        let score = scenario
            .optimization_score
            .map(|s| format!("{:.3}", s))
            .unwrap_or_else(|| "-".to_string());
        println!(
            " {} {:<24} {:>14.2} {:>8}  {}",
            marker,
            truncate(scenario.option.name(), 24),
            scenario.projected_amount,
            score,
            scenario.time_to_goal
        );
    }

    let insights = &result.insights;
    println!();
    println!("💡 Insights");
    println!(
        "   Best projection: {} ({:.2})",
        insights.best_option, insights.best_projected_amount
    );
    if insights.shortfall > 0.0 {
        println!("   Shortfall: {:.2}", insights.shortfall);
    }
    println!(
        "   Inflation-adjusted target ({:.1}%): {:.2}",
        insights.inflation_rate * 100.0,
        insights.inflation_adjusted_target
    );
    println!(
        "   Contribution needed to hit target: {:.2}/mo",
        insights.recommended_monthly_contribution
    );
    for note in &insights.notes {
        println!("   [{}] {}", note.severity, note.message);
    }
    println!();
}

/// Seeded Monte Carlo run for one goal and option
pub fn cmd_simulate(
    ctx: &Ctx,
    file: &Path,
    goal_id: &str,
    option_name: &str,
    iterations: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let plan = load_plan_file(file)?;
    let profile = plan.build_profile()?;
    let goal = plan.find_goal(goal_id)?;
    let option = ctx.config.option_by_name(option_name).ok_or_else(|| {
        anyhow!(goalpath_core::Error::NotFound(format!(
            "investment option '{}'",
            option_name
        )))
    })?;

    let mut sim = SimulationConfig::from_settings(&ctx.config.simulation)
        .with_max_horizon(ctx.config.projection.max_horizon_months);
    if let Some(n) = iterations {
        sim = sim.with_iterations(n);
    }
    if let Some(s) = seed {
        sim = sim.with_seed(s);
    }

    let summary = simulate(goal, &profile, option, &sim, ctx.as_of)?;

    if ctx.json {
        return print_json(&summary);
    }

    println!();
    println!("🎲 Simulation: {} with {}", goal.title(), summary.option);
    println!("   ─────────────────────────────");
    println!("   Paths:        {} (seed {})", summary.iterations, summary.seed);
    println!("   Horizon:      {} months", summary.months);
    println!("   Contribution: {:.2}/mo", summary.monthly_contribution);
    println!("   Target:       {:.2}", summary.target_amount);
    println!();
    println!(
        "   Success probability: {:.1}%",
        summary.success_probability * 100.0
    );
    println!("   Mean outcome:        {:.2}", summary.mean);
    println!("   P10 / P50 / P90:     {:.2} / {:.2} / {:.2}", summary.p10, summary.p50, summary.p90);
    println!();
    Ok(())
}

/// Replay one goal under base, optimistic, pessimistic and unexpected-event assumptions
pub fn cmd_scenarios(ctx: &Ctx, file: &Path, goal_id: &str) -> Result<()> {
    let plan = load_plan_file(file)?;
    let profile = plan.build_profile()?;
    let goal = plan.find_goal(goal_id)?;

    let analysis = analyze_life_scenarios(
        goal,
        &profile,
        ctx.as_of,
        ctx.config.projection.max_horizon_months,
    );

    if ctx.json {
        return print_json(&analysis);
    }

    println!();
    println!("🔮 Life scenarios: {} ({} months)", goal.title(), analysis.months);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<18} {:>8} {:>8} {:>12} {:>14}  {}",
        "Scenario", "Return", "Growth", "Monthly", "Final", "Time to goal"
    );
    for outcome in &analysis.scenarios {
        println!(
            "   {:<18} {:>7.1}% {:>7.1}% {:>12.2} {:>14.2}  {}",
            outcome.kind,
            outcome.assumptions.market_return * 100.0,
            outcome.assumptions.income_growth * 100.0,
            outcome.monthly_contribution,
            outcome.final_amount,
            outcome.time_to_goal
        );
    }
    println!();
    println!(
        "   {} of {} scenarios reach {:.2}; best {}, worst {}",
        analysis.scenarios_reaching_target,
        analysis.scenarios.len(),
        analysis.target_amount,
        analysis.best_case,
        analysis.worst_case
    );
    println!();
    Ok(())
}

/// Month-by-month balances per option, to stdout or a file.
/// Files ending in `.json` are written as JSON, everything else as CSV.
pub fn cmd_schedule(ctx: &Ctx, file: &Path, goal_id: &str, output: Option<&Path>) -> Result<()> {
    let plan = load_plan_file(file)?;
    let profile = plan.build_profile()?;
    let goal = plan.find_goal(goal_id)?;

    let engine = ProjectionEngine::from_config(&ctx.config);
    let rows = engine.growth_schedule(goal, &profile, ctx.as_of)?;

    match output {
        Some(path) => {
            let format = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse::<ExportFormat>().ok())
                .unwrap_or(ExportFormat::Csv);
            let out = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export::write_schedule(&rows, format, out)?;
            println!("✅ Wrote {} rows to {}", rows.len(), path.display());
        }
        None if ctx.json => export::write_schedule_json(&rows, std::io::stdout().lock())?,
        None => export::write_schedule_csv(&rows, std::io::stdout().lock())?,
    }
    Ok(())
}
