//! Goalpath CLI - Savings goal projection and allocation planner
//!
//! Usage:
//!   goalpath catalog                               Show investment options
//!   goalpath project --file plan.toml --goal car   Project one goal
//!   goalpath plan --file plan.toml                 Prioritise and allocate
//!   goalpath serve --port 3000                     Start REST API server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries command output only
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    // The server loads its own config; calculators need none
    let load_ctx = || commands::Ctx::load(cli.config.as_deref(), cli.as_of, cli.json);

    match cli.command {
        Commands::Serve { port, host } => {
            commands::cmd_serve(cli.config.as_deref(), &host, port).await
        }
        Commands::Catalog => commands::cmd_catalog(&load_ctx()?),
        Commands::Profile { file } => commands::cmd_profile(&load_ctx()?, &file),
        Commands::Project {
            file,
            goal,
            refreshed_savings,
            education,
        } => commands::cmd_project(&load_ctx()?, &file, &goal, refreshed_savings, education),
        Commands::Plan { file } => commands::cmd_plan(&load_ctx()?, &file),
        Commands::Milestones { file, notified } => {
            commands::cmd_milestones(&load_ctx()?, &file, notified.as_deref())
        }
        Commands::Simulate {
            file,
            goal,
            option,
            iterations,
            seed,
        } => commands::cmd_simulate(&load_ctx()?, &file, &goal, &option, iterations, seed),
        Commands::Scenarios { file, goal } => commands::cmd_scenarios(&load_ctx()?, &file, &goal),
        Commands::Schedule { file, goal, output } => {
            commands::cmd_schedule(&load_ctx()?, &file, &goal, output.as_deref())
        }
        Commands::Calc { calc } => match calc {
            CalcType::Savings {
                target,
                current,
                monthly,
                years,
                rate,
            } => commands::cmd_calc_savings(target, current, monthly, years, rate, cli.json),
            CalcType::Loan {
                principal,
                rate,
                months,
            } => commands::cmd_calc_loan(principal, rate, months, cli.json),
            CalcType::Invest {
                principal,
                monthly,
                rate,
                years,
            } => commands::cmd_calc_invest(principal, monthly, rate, years, cli.json),
            CalcType::Retire {
                age,
                retire_at,
                income,
                desired,
                savings,
                rate,
            } => commands::cmd_calc_retire(age, retire_at, income, desired, savings, rate, cli.json),
            CalcType::Credit { score } => commands::cmd_calc_credit(score, cli.json),
        },
    }
}
