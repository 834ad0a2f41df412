//! Allocation of disposable income across goals
//!
//! Goals are served strictly in priority order. Each one may take at most 30%
//! of what is left when its turn comes, and 20% of the final remainder is set
//! aside as an emergency reserve. Remaining income never increases, so the
//! total handed out can never exceed the disposable income.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ensure_finite, ensure_non_negative, ensure_unit_interval, Result};
use crate::projection::CONTRIBUTION_CAP;

/// Share of the final remainder kept as an emergency reserve
pub const RESERVE_SHARE: f64 = 0.2;

/// One goal competing for income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub goal_id: String,
    pub priority_score: f64,
    pub required_monthly_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub goal_id: String,
    pub recommended_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// In the order the goals were served
    pub allocations: Vec<Allocation>,
    pub emergency_reserve: f64,
    /// Income left over after contributions and the reserve
    pub unallocated: f64,
    /// Shortfall when disposable income is negative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deficit: Option<f64>,
}

impl AllocationPlan {
    pub fn total_contributions(&self) -> f64 {
        self.allocations.iter().map(|a| a.recommended_contribution).sum()
    }

    /// Contributions plus the reserve
    pub fn total_committed(&self) -> f64 {
        self.total_contributions() + self.emergency_reserve
    }

    pub fn contribution_for(&self, goal_id: &str) -> Option<f64> {
        self.allocations
            .iter()
            .find(|a| a.goal_id == goal_id)
            .map(|a| a.recommended_contribution)
    }
}

/// Priority descending, then goal id ascending
fn service_order(a: &AllocationRequest, b: &AllocationRequest) -> Ordering {
    b.priority_score
        .total_cmp(&a.priority_score)
        .then_with(|| a.goal_id.cmp(&b.goal_id))
}

pub struct AllocationAllocator;

impl AllocationAllocator {
    pub fn allocate(disposable_income: f64, requests: &[AllocationRequest]) -> Result<AllocationPlan> {
        let disposable_income = ensure_finite("disposable_income", disposable_income)?;
        for request in requests {
            ensure_unit_interval("priority_score", request.priority_score)?;
            ensure_non_negative("required_monthly_contribution", request.required_monthly_contribution)?;
        }

        let mut ordered: Vec<&AllocationRequest> = requests.iter().collect();
        ordered.sort_by(|a, b| service_order(a, b));

        if disposable_income <= 0.0 {
            warn!(disposable_income, goals = requests.len(), "No disposable income to allocate");
            return Ok(AllocationPlan {
                allocations: ordered
                    .into_iter()
                    .map(|r| Allocation {
                        goal_id: r.goal_id.clone(),
                        recommended_contribution: 0.0,
                    })
                    .collect(),
                emergency_reserve: 0.0,
                unallocated: 0.0,
                deficit: (disposable_income < 0.0).then_some(-disposable_income),
            });
        }

        let mut remaining = disposable_income;
        let mut allocations = Vec::with_capacity(ordered.len());
        for request in ordered {
            let cap = remaining * CONTRIBUTION_CAP;
            let contribution = request.required_monthly_contribution.min(cap).max(0.0);
            remaining -= contribution;
            debug!(
                goal_id = %request.goal_id,
                required = request.required_monthly_contribution,
                contribution,
                remaining,
                "Allocated"
            );
            allocations.push(Allocation {
                goal_id: request.goal_id.clone(),
                recommended_contribution: contribution,
            });
        }

        let emergency_reserve = remaining * RESERVE_SHARE;
        Ok(AllocationPlan {
            allocations,
            emergency_reserve,
            unallocated: remaining - emergency_reserve,
            deficit: None,
        })
    }
}
