//! Domain models for goalpath
//!
//! Value objects validate their invariants at construction and are immutable
//! afterwards. Deserialization goes through the same constructors, so a
//! `Goal` or `FinancialProfile` read from a plan file or request body is as
//! trustworthy as one built in code.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, ensure_unit_interval, Error, Result};

/// Investor risk appetite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Weight applied to expected return when scoring scenarios
    pub fn return_multiplier(&self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 0.75,
            Self::High => 1.0,
        }
    }
}

impl std::str::FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown risk tolerance: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved financial profile, built once per planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileInput")]
pub struct FinancialProfile {
    monthly_income: f64,
    monthly_expenses: f64,
    existing_savings: f64,
    risk_tolerance: RiskTolerance,
    age: u32,
}

/// Unvalidated wire shape of a [`FinancialProfile`]
#[derive(Debug, Clone, Deserialize)]
struct ProfileInput {
    monthly_income: f64,
    monthly_expenses: f64,
    existing_savings: f64,
    risk_tolerance: RiskTolerance,
    age: u32,
}

impl TryFrom<ProfileInput> for FinancialProfile {
    type Error = Error;

    fn try_from(input: ProfileInput) -> Result<Self> {
        FinancialProfile::new(
            input.monthly_income,
            input.monthly_expenses,
            input.existing_savings,
            input.risk_tolerance,
            input.age,
        )
    }
}

impl FinancialProfile {
    pub fn new(
        monthly_income: f64,
        monthly_expenses: f64,
        existing_savings: f64,
        risk_tolerance: RiskTolerance,
        age: u32,
    ) -> Result<Self> {
        Ok(Self {
            monthly_income: ensure_non_negative("monthly_income", monthly_income)?,
            monthly_expenses: ensure_non_negative("monthly_expenses", monthly_expenses)?,
            existing_savings: ensure_non_negative("existing_savings", existing_savings)?,
            risk_tolerance,
            age,
        })
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn monthly_expenses(&self) -> f64 {
        self.monthly_expenses
    }

    pub fn existing_savings(&self) -> f64 {
        self.existing_savings
    }

    pub fn risk_tolerance(&self) -> RiskTolerance {
        self.risk_tolerance
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Income minus expenses. Negative values are a deficit, not an error.
    pub fn disposable_income(&self) -> f64 {
        self.monthly_income - self.monthly_expenses
    }

    /// Copy of this profile with a different savings figure
    pub fn with_existing_savings(&self, existing_savings: f64) -> Result<Self> {
        Ok(Self {
            existing_savings: ensure_non_negative("existing_savings", existing_savings)?,
            ..self.clone()
        })
    }
}

/// Lifecycle state of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowest and highest display tier
pub const MIN_PRIORITY_TIER: u8 = 1;
pub const MAX_PRIORITY_TIER: u8 = 3;

/// Tier assigned before the first priority update
pub const DEFAULT_PRIORITY_TIER: u8 = 2;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GoalInput")]
pub struct Goal {
    id: String,
    title: String,
    target_amount: f64,
    current_amount: f64,
    deadline: NaiveDate,
    priority_tier: u8,
    status: GoalStatus,
}

/// Unvalidated wire shape of a [`Goal`]
#[derive(Debug, Clone, Deserialize)]
struct GoalInput {
    id: String,
    title: String,
    target_amount: f64,
    #[serde(default)]
    current_amount: f64,
    deadline: DateInput,
    #[serde(default)]
    priority_tier: Option<u8>,
    #[serde(default)]
    status: Option<GoalStatus>,
}

/// A date as JSON text or a native TOML date
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DateInput {
    Text(NaiveDate),
    Toml(toml::value::Datetime),
}

impl DateInput {
    fn into_date(self) -> Result<NaiveDate> {
        match self {
            DateInput::Text(date) => Ok(date),
            DateInput::Toml(datetime) => {
                let date = datetime
                    .date
                    .ok_or_else(|| Error::invalid(format!("deadline '{}' has no date", datetime)))?;
                NaiveDate::from_ymd_opt(
                    i32::from(date.year),
                    u32::from(date.month),
                    u32::from(date.day),
                )
                .ok_or_else(|| Error::invalid(format!("deadline '{}' is not a valid date", datetime)))
            }
        }
    }
}

impl TryFrom<GoalInput> for Goal {
    type Error = Error;

    fn try_from(input: GoalInput) -> Result<Self> {
        let mut goal = Goal::new(
            input.id,
            input.title,
            input.target_amount,
            input.current_amount,
            input.deadline.into_date()?,
        )?;
        if let Some(tier) = input.priority_tier {
            goal = goal.with_priority_tier(tier)?;
        }
        if let Some(status) = input.status {
            goal = goal.with_status(status);
        }
        Ok(goal)
    }
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        target_amount: f64,
        current_amount: f64,
        deadline: NaiveDate,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid("goal id must not be empty"));
        }
        let target_amount = ensure_finite("target_amount", target_amount)?;
        if target_amount <= 0.0 {
            return Err(Error::invalid(format!(
                "target_amount must be > 0 (got {})",
                target_amount
            )));
        }
        let current_amount = ensure_non_negative("current_amount", current_amount)?;

        let status = if current_amount >= target_amount {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        };

        Ok(Self {
            id,
            title: title.into(),
            target_amount,
            current_amount,
            deadline,
            priority_tier: DEFAULT_PRIORITY_TIER,
            status,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    pub fn current_amount(&self) -> f64 {
        self.current_amount
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn priority_tier(&self) -> u8 {
        self.priority_tier
    }

    pub fn status(&self) -> GoalStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    /// Amount still missing, never negative
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Progress towards the target in percent (may exceed 100)
    pub fn progress_pct(&self) -> f64 {
        self.current_amount / self.target_amount * 100.0
    }

    /// Record a new saved amount. Reaching the target completes the goal.
    pub fn with_current_amount(&self, current_amount: f64) -> Result<Self> {
        let current_amount = ensure_non_negative("current_amount", current_amount)?;
        let status = if current_amount >= self.target_amount {
            GoalStatus::Completed
        } else if self.status == GoalStatus::Completed {
            GoalStatus::Active
        } else {
            self.status
        };
        Ok(Self {
            current_amount,
            status,
            ..self.clone()
        })
    }

    pub fn with_priority_tier(&self, tier: u8) -> Result<Self> {
        if !(MIN_PRIORITY_TIER..=MAX_PRIORITY_TIER).contains(&tier) {
            return Err(Error::invalid(format!(
                "priority_tier must be within {}..={} (got {})",
                MIN_PRIORITY_TIER, MAX_PRIORITY_TIER, tier
            )));
        }
        Ok(Self {
            priority_tier: tier,
            ..self.clone()
        })
    }

    /// Pause or resume a goal. Completion is derived from the amounts only.
    pub fn with_status(&self, status: GoalStatus) -> Self {
        let status = if self.current_amount >= self.target_amount {
            GoalStatus::Completed
        } else if status == GoalStatus::Completed {
            GoalStatus::Active
        } else {
            status
        };
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Catalog entry describing an investment vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionInput")]
pub struct InvestmentOption {
    name: String,
    expected_annual_return: f64,
    risk_level: f64,
    liquidity_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct OptionInput {
    name: String,
    expected_annual_return: f64,
    risk_level: f64,
    liquidity_score: f64,
}

impl TryFrom<OptionInput> for InvestmentOption {
    type Error = Error;

    fn try_from(input: OptionInput) -> Result<Self> {
        InvestmentOption::new(
            input.name,
            input.expected_annual_return,
            input.risk_level,
            input.liquidity_score,
        )
    }
}

impl InvestmentOption {
    pub fn new(
        name: impl Into<String>,
        expected_annual_return: f64,
        risk_level: f64,
        liquidity_score: f64,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid("investment option name must not be empty"));
        }
        Ok(Self {
            name,
            expected_annual_return: ensure_unit_interval(
                "expected_annual_return",
                expected_annual_return,
            )?,
            risk_level: ensure_unit_interval("risk_level", risk_level)?,
            liquidity_score: ensure_unit_interval("liquidity_score", liquidity_score)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expected_annual_return(&self) -> f64 {
        self.expected_annual_return
    }

    pub fn risk_level(&self) -> f64 {
        self.risk_level
    }

    pub fn liquidity_score(&self) -> f64 {
        self.liquidity_score
    }

    /// For compiled-in reference data whose ranges are known to hold
    pub(crate) fn builtin(
        name: &str,
        expected_annual_return: f64,
        risk_level: f64,
        liquidity_score: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            expected_annual_return,
            risk_level,
            liquidity_score,
        }
    }
}

/// Shared, immutable investment catalog. Cloning shares the same allocation.
pub type Catalog = Arc<[InvestmentOption]>;

/// When (if ever) a scenario reaches the goal's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimeToGoal {
    /// Target reached after this many months
    Reached { months: u32 },
    /// Target not reached within the bounded horizon
    Unreachable { horizon_months: u32 },
}

impl TimeToGoal {
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Reached { months } => Some(*months),
            Self::Unreachable { .. } => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

impl std::fmt::Display for TimeToGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reached { months } => write!(f, "{} months", months),
            Self::Unreachable { horizon_months } => {
                write!(f, "unreachable within {} months", horizon_months)
            }
        }
    }
}

/// Projected outcome of one investment option over a goal's horizon.
/// Derived per request and never persisted as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionScenario {
    pub option: InvestmentOption,
    /// Position of the option in the catalog (tie-break key)
    pub catalog_index: usize,
    /// Months between the as-of date and the deadline (floored at 1)
    pub horizon_months: u32,
    pub monthly_contribution: f64,
    pub projected_amount: f64,
    pub time_to_goal: TimeToGoal,
    /// Filled in by the scenario optimizer
    pub optimization_score: Option<f64>,
}
