//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `Ctx` - Engine config, as-of date and output mode shared by commands
//! - `load_plan_file` - Read a TOML or JSON plan file
//! - `cmd_catalog` - Show the investment catalog
//! - `cmd_profile` - Build and show the financial profile

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use goalpath_core::{
    EngineConfig, FinancialProfile, Goal, NotifiedMilestones, PlanGoal, ProfileBuilder,
    ProfileOverrides, RawProfile,
};
use serde::{Deserialize, Serialize};

use super::truncate;

/// Everything a command needs besides its own arguments
pub struct Ctx {
    pub config: EngineConfig,
    pub as_of: NaiveDate,
    pub json: bool,
}

impl Ctx {
    /// Load engine config and fix the as-of date (today unless given)
    pub fn load(config_path: Option<&Path>, as_of: Option<NaiveDate>, json: bool) -> Result<Self> {
        let config = EngineConfig::load(config_path).context("Failed to load engine config")?;
        let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
        Ok(Self {
            config,
            as_of,
            json,
        })
    }
}

/// `[profile]` table of a plan file: raw figures plus optional overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSection {
    #[serde(flatten)]
    pub raw: RawProfile,
    #[serde(default)]
    pub overrides: ProfileOverrides,
}

/// A household's profile and goals, read from disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub profile: ProfileSection,
    #[serde(default)]
    pub goals: Vec<PlanGoal>,
}

impl PlanFile {
    pub fn build_profile(&self) -> Result<FinancialProfile> {
        ProfileBuilder::build(&self.profile.raw, &self.profile.overrides)
            .context("Invalid profile in plan file")
    }

    /// Look up a goal by ID
    pub fn find_goal(&self, goal_id: &str) -> Result<&Goal> {
        self.goals
            .iter()
            .map(|g| &g.goal)
            .find(|g| g.id() == goal_id)
            .ok_or_else(|| anyhow!(goalpath_core::Error::NotFound(format!("goal '{}'", goal_id))))
    }

    pub fn goals(&self) -> Vec<Goal> {
        self.goals.iter().map(|g| g.goal.clone()).collect()
    }
}

/// Read a plan file, as JSON when the extension says so and TOML otherwise
pub fn load_plan_file(path: &Path) -> Result<PlanFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let plan: PlanFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON plan file {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML plan file {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), goals = plan.goals.len(), "Loaded plan file");
    Ok(plan)
}

/// Parse `goal:pct` pairs, e.g. "car:25,car:50"
pub fn parse_notified(pairs: &str) -> Result<NotifiedMilestones> {
    let mut notified = NotifiedMilestones::new();
    for pair in pairs.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((goal_id, pct)) = pair.rsplit_once(':') else {
            bail!("Invalid milestone '{}' (expected goal:pct)", pair);
        };
        let pct: u8 = pct
            .trim()
            .parse()
            .with_context(|| format!("Invalid milestone percentage in '{}'", pair))?;
        notified.insert(goal_id.trim(), pct);
    }
    Ok(notified)
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn cmd_catalog(ctx: &Ctx) -> Result<()> {
    if ctx.json {
        return print_json(&ctx.config.catalog[..]);
    }

    println!();
    println!("📈 Investment Catalog ({})", ctx.config.source);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<24} {:>8} {:>8} {:>10}",
        "Option", "Return", "Risk", "Liquidity"
    );
    for option in ctx.config.catalog.iter() {
        println!(
            "   {:<24} {:>7.1}% {:>8.2} {:>10.2}",
            truncate(option.name(), 24),
            option.expected_annual_return() * 100.0,
            option.risk_level(),
            option.liquidity_score()
        );
    }
    println!();
    Ok(())
}

pub fn cmd_profile(ctx: &Ctx, file: &Path) -> Result<()> {
    let plan = load_plan_file(file)?;
    let profile = plan.build_profile()?;

    if ctx.json {
        return print_json(&profile);
    }

    println!();
    println!("👤 Financial Profile");
    println!("   ─────────────────────────────");
    println!("   Monthly income:    {:>12.2}", profile.monthly_income());
    println!("   Monthly expenses:  {:>12.2}", profile.monthly_expenses());
    println!("   Disposable income: {:>12.2}", profile.disposable_income());
    println!("   Existing savings:  {:>12.2}", profile.existing_savings());
    println!("   Risk tolerance:    {:>12}", profile.risk_tolerance());
    println!("   Age:               {:>12}", profile.age());
    if profile.disposable_income() < 0.0 {
        println!();
        println!("   ⚠️  Expenses exceed income; no contributions can be funded");
    }
    println!();
    Ok(())
}
