//! Priority scoring
//!
//! Urgency, progress and personal value combine into a score in `[0, 1]`,
//! which maps onto the three display tiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_unit_interval, Error, Result};
use crate::models::{Goal, MAX_PRIORITY_TIER, MIN_PRIORITY_TIER};
use crate::projection::months_to_goal;

const URGENCY_WEIGHT: f64 = 0.4;
const IMPACT_WEIGHT: f64 = 0.4;
const PERSONAL_WEIGHT: f64 = 0.2;

/// Personal value assumed when the caller gives none
pub const DEFAULT_PERSONAL_VALUE: f64 = 0.5;

/// Horizon at or below which a goal counts as fully urgent
const URGENT_WITHIN_MONTHS: f64 = 12.0;

/// Caller-supplied priority inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CriteriaInput")]
pub struct PriorityCriteria {
    personal_value: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct CriteriaInput {
    #[serde(default = "default_personal_value")]
    personal_value: f64,
}

fn default_personal_value() -> f64 {
    DEFAULT_PERSONAL_VALUE
}

impl TryFrom<CriteriaInput> for PriorityCriteria {
    type Error = Error;

    fn try_from(input: CriteriaInput) -> Result<Self> {
        PriorityCriteria::new(input.personal_value)
    }
}

impl PriorityCriteria {
    /// `personal_value` must be within `[0, 1]`
    pub fn new(personal_value: f64) -> Result<Self> {
        Ok(Self {
            personal_value: ensure_unit_interval("personal_value", personal_value)?,
        })
    }

    pub fn personal_value(&self) -> f64 {
        self.personal_value
    }
}

impl Default for PriorityCriteria {
    fn default() -> Self {
        Self {
            personal_value: DEFAULT_PERSONAL_VALUE,
        }
    }
}

/// New priority of one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityUpdate {
    pub goal_id: String,
    pub new_tier: u8,
    pub score: f64,
}

pub struct PriorityScorer;

impl PriorityScorer {
    /// `min(1, 12 / months)`
    pub fn time_urgency(months: u32) -> f64 {
        (URGENT_WITHIN_MONTHS / f64::from(months.max(1))).min(1.0)
    }

    /// `min(1, current / target)`
    pub fn financial_impact(goal: &Goal) -> f64 {
        (goal.current_amount() / goal.target_amount()).min(1.0)
    }

    pub fn score(goal: &Goal, criteria: &PriorityCriteria, as_of: NaiveDate) -> f64 {
        let months = months_to_goal(goal.deadline(), as_of);
        let score = Self::time_urgency(months) * URGENCY_WEIGHT
            + Self::financial_impact(goal) * IMPACT_WEIGHT
            + criteria.personal_value() * PERSONAL_WEIGHT;
        // weights sum to 1; clamp away rounding at the edges
        score.clamp(0.0, 1.0)
    }

    /// `clamp(round(score × 3), 1, 3)`
    pub fn tier(score: f64) -> u8 {
        let tier = (score * 3.0).round();
        tier.clamp(f64::from(MIN_PRIORITY_TIER), f64::from(MAX_PRIORITY_TIER)) as u8
    }

    pub fn evaluate(goal: &Goal, criteria: &PriorityCriteria, as_of: NaiveDate) -> PriorityUpdate {
        let score = Self::score(goal, criteria, as_of);
        PriorityUpdate {
            goal_id: goal.id().to_string(),
            new_tier: Self::tier(score),
            score,
        }
    }
}
