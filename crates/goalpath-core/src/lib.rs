//! Goalpath Core Library
//!
//! The goal projection and allocation engine:
//! - Validated value objects for profiles, goals and the investment catalog
//! - Profile building from partial, aggregated inputs
//! - Compound-growth projections per investment option
//! - Risk-weighted scenario scoring and selection
//! - Priority scoring and priority-ordered income allocation
//! - Stateless milestone evaluation
//! - Composable projection adjustments (refreshed balances, income growth)
//! - Seeded Monte Carlo simulation and standalone calculators
//! - Life-scenario analysis and credit health classification
//! - Engine configuration and CSV export
//!
//! Every operation is a pure, synchronous function of its inputs. Anything
//! that depends on "today" takes an explicit `as_of` date.

pub mod adjustments;
pub mod allocation;
pub mod calculators;
pub mod config;
pub mod credit;
pub mod error;
pub mod export;
pub mod insights;
pub mod milestones;
pub mod models;
pub mod optimizer;
pub mod plan;
pub mod priority;
pub mod profile;
pub mod projection;
pub mod scenarios;
pub mod simulation;

/// Shared fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adjustments::{
    AdjustmentPipeline, EducationLevel, IncomeGrowth, ProjectionAdjustment, RefreshedBalances,
};
pub use allocation::{Allocation, AllocationAllocator, AllocationPlan, AllocationRequest};
pub use config::{ConfigSource, EngineConfig, ProjectionSettings, SimulationSettings};
pub use credit::{analyze_credit_score, CreditAnalysis, CreditHealth};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use insights::{GoalInsights, InsightGenerator, Severity};
pub use milestones::{
    Milestone, MilestoneEvent, MilestoneSet, MilestoneTracker, NotifiedMilestone, NotifiedMilestones,
};
pub use models::{
    Catalog, FinancialProfile, Goal, GoalStatus, InvestmentOption, ProjectionScenario,
    RiskTolerance, TimeToGoal,
};
pub use optimizer::ScenarioOptimizer;
pub use plan::{FinancialPlan, PlanBuilder, PlanGoal, PlanInsight, PlanInsightKind};
pub use priority::{PriorityCriteria, PriorityScorer, PriorityUpdate};
pub use profile::{ProfileBuilder, ProfileOverrides, RawProfile};
pub use projection::{Funding, ProjectionEngine, ProjectionResult, ScheduleRow};
pub use scenarios::{
    analyze_life_scenarios, LifeAssumptions, LifeScenarioAnalysis, LifeScenarioKind, LifeScenarioOutcome,
};
pub use simulation::{simulate, SimulationConfig, SimulationSummary};
