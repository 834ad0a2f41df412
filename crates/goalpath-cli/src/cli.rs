//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use goalpath_core::EducationLevel;

/// Goalpath - Project, prioritise and fund your savings goals
#[derive(Parser)]
#[command(name = "goalpath")]
#[command(about = "Savings goal projection and allocation planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Date to plan from (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub as_of: Option<NaiveDate>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the investment catalog
    Catalog,

    /// Build and show the financial profile from a plan file
    Profile {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Project one goal across every investment option
    Project {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Goal ID
        #[arg(short, long)]
        goal: String,

        /// Re-project with a refreshed aggregated savings balance
        #[arg(long)]
        refreshed_savings: Option<f64>,

        /// Grow contributions yearly by education level:
        /// secondary, undergraduate, postgraduate, professional
        #[arg(long)]
        education: Option<EducationLevel>,
    },

    /// Prioritise active goals and allocate disposable income
    Plan {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show milestones reached but not yet notified
    Milestones {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Already-notified milestones as goal:pct pairs (e.g. "car:25,car:50")
        #[arg(long)]
        notified: Option<String>,
    },

    /// Run a seeded Monte Carlo simulation for one goal and option
    Simulate {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Goal ID
        #[arg(short, long)]
        goal: String,

        /// Investment option name (case-insensitive)
        #[arg(short, long)]
        option: String,

        /// Number of sampled paths (defaults to config)
        #[arg(long)]
        iterations: Option<u32>,

        /// Random seed (defaults to config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compare one goal under base, optimistic, pessimistic and unexpected-event assumptions
    Scenarios {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Goal ID
        #[arg(short, long)]
        goal: String,
    },

    /// Export the month-by-month growth schedule of one goal as CSV
    Schedule {
        /// Plan file (TOML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Goal ID
        #[arg(short, long)]
        goal: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Standalone financial calculators
    Calc {
        #[command(subcommand)]
        calc: CalcType,
    },

    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

/// Rates are fractions: 0.08 means 8%
#[derive(Subcommand)]
pub enum CalcType {
    /// Will current savings plus a monthly contribution reach a target?
    Savings {
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "0")]
        current: f64,
        #[arg(long)]
        monthly: f64,
        #[arg(long)]
        years: u32,
        #[arg(long, default_value = "0")]
        rate: f64,
    },

    /// Monthly instalment of a loan
    Loan {
        #[arg(long)]
        principal: f64,
        #[arg(long)]
        rate: f64,
        /// Tenure in months
        #[arg(long)]
        months: u32,
    },

    /// Future value of an investment with monthly top-ups
    Invest {
        #[arg(long)]
        principal: f64,
        #[arg(long, default_value = "0")]
        monthly: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
    },

    /// Corpus and monthly savings needed for retirement
    Retire {
        #[arg(long)]
        age: u32,
        #[arg(long)]
        retire_at: u32,
        /// Current annual income
        #[arg(long)]
        income: f64,
        /// Desired annual income in retirement (today's money)
        #[arg(long)]
        desired: f64,
        #[arg(long, default_value = "0")]
        savings: f64,
        #[arg(long)]
        rate: f64,
    },

    /// Credit health band and recommended actions for a bureau score
    Credit {
        #[arg(long)]
        score: u16,
    },
}
