//! Plan and milestone command implementations

use std::path::Path;

use anyhow::{Context, Result};
use goalpath_core::{MilestoneTracker, NotifiedMilestones, PlanBuilder};
use serde::Serialize;

use super::{load_plan_file, parse_notified, print_json, truncate, Ctx};

/// Prioritise active goals and allocate disposable income
pub fn cmd_plan(ctx: &Ctx, file: &Path) -> Result<()> {
    let plan_file = load_plan_file(file)?;
    let profile = plan_file.build_profile()?;
    let plan = PlanBuilder::build(&profile, &plan_file.goals, ctx.as_of)
        .context("Failed to build plan")?;

    if ctx.json {
        return print_json(&plan);
    }

    println!();
    println!("🗓️  Financial Plan as of {}", plan.as_of);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Disposable income: {:.2}/mo", plan.disposable_income);

    if plan.priorities.is_empty() {
        println!();
        println!("   No active goals. Add goals to the [[goals]] section of the plan file.");
    } else {
        println!();
        println!(
            "   {:<24} {:>6} {:>6} {:>14}",
            "Goal", "Score", "Tier", "Contribution"
        );
        for update in &plan.priorities {
            let contribution = plan
                .allocation
                .contribution_for(&update.goal_id)
                .unwrap_or(0.0);
            println!(
                "   {:<24} {:>6.3} {:>6} {:>14.2}",
                truncate(&update.goal_id, 24),
                update.score,
                update.new_tier,
                contribution
            );
        }
    }

    let allocation = &plan.allocation;
    println!();
    println!("   Emergency reserve: {:.2}", allocation.emergency_reserve);
    println!("   Unallocated:       {:.2}", allocation.unallocated);
    if let Some(deficit) = allocation.deficit {
        println!("   ⚠️  Deficit:        {:.2}/mo", deficit);
    }

    if !plan.insights.is_empty() {
        println!();
        println!("💡 Insights");
        for insight in &plan.insights {
            println!("   [{}] {}", insight.severity, insight.message);
            println!("      {}", insight.recommendation);
        }
    }
    println!();
    Ok(())
}

#[derive(Serialize)]
struct MilestoneReport<'a> {
    events: &'a [goalpath_core::MilestoneEvent],
    notified: &'a NotifiedMilestones,
}

/// Show milestones crossed but not yet notified.
/// The updated notified set is printed so callers can feed it back in.
pub fn cmd_milestones(ctx: &Ctx, file: &Path, notified: Option<&str>) -> Result<()> {
    let plan_file = load_plan_file(file)?;
    let mut already = match notified {
        Some(pairs) => parse_notified(pairs)?,
        None => NotifiedMilestones::new(),
    };

    let tracker = MilestoneTracker::new(ctx.config.milestones.clone());
    let events = tracker.evaluate_all(&plan_file.goals(), &already);
    already.record(&events);

    if ctx.json {
        return print_json(&MilestoneReport {
            events: &events,
            notified: &already,
        });
    }

    if events.is_empty() {
        println!("No new milestones reached.");
        return Ok(());
    }

    println!();
    println!("🏁 Milestones Reached");
    println!("   ─────────────────────────────");
    for event in &events {
        println!("   {:<20} {:>3}%  {}", truncate(&event.goal_id, 20), event.percentage, event.message);
    }

    let notified_arg: Vec<String> = events
        .iter()
        .map(|e| format!("{}:{}", e.goal_id, e.percentage))
        .collect();
    println!();
    println!("   Pass --notified \"{}\" next time to skip these.", notified_arg.join(","));
    println!();
    Ok(())
}
