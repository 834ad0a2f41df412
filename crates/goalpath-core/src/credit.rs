//! Credit health classification
//!
//! Maps a bureau credit score onto a health band with recommended actions.
//! Fetching the score is the caller's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest score any supported bureau reports
pub const MAX_CREDIT_SCORE: u16 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditHealth {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CreditHealth {
    /// Band for a score: below 300 poor, below 600 fair, below 750 good
    pub fn from_score(score: u16) -> Self {
        match score {
            0..=299 => CreditHealth::Poor,
            300..=599 => CreditHealth::Fair,
            600..=749 => CreditHealth::Good,
            _ => CreditHealth::Excellent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditHealth::Poor => "poor",
            CreditHealth::Fair => "fair",
            CreditHealth::Good => "good",
            CreditHealth::Excellent => "excellent",
        }
    }

    pub fn recommended_actions(&self) -> &'static [&'static str] {
        match self {
            CreditHealth::Poor => &[
                "Pay all bills on time",
                "Reduce credit utilization",
                "Avoid new credit applications",
            ],
            CreditHealth::Fair => &[
                "Maintain consistent payment history",
                "Reduce outstanding debts",
            ],
            CreditHealth::Good => &[
                "Continue good financial habits",
                "Consider consolidating debts",
            ],
            CreditHealth::Excellent => &[
                "Maintain current financial practices",
                "Explore premium financial products",
            ],
        }
    }
}

impl fmt::Display for CreditHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAnalysis {
    pub score: u16,
    pub health: CreditHealth,
    pub recommended_actions: Vec<String>,
}

pub fn analyze_credit_score(score: u16) -> Result<CreditAnalysis> {
    if score > MAX_CREDIT_SCORE {
        return Err(Error::invalid(format!(
            "credit score must be within 0..={} (got {})",
            MAX_CREDIT_SCORE, score
        )));
    }
    let health = CreditHealth::from_score(score);
    Ok(CreditAnalysis {
        score,
        health,
        recommended_actions: health
            .recommended_actions()
            .iter()
            .map(|a| a.to_string())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(CreditHealth::from_score(0), CreditHealth::Poor);
        assert_eq!(CreditHealth::from_score(299), CreditHealth::Poor);
        assert_eq!(CreditHealth::from_score(300), CreditHealth::Fair);
        assert_eq!(CreditHealth::from_score(599), CreditHealth::Fair);
        assert_eq!(CreditHealth::from_score(600), CreditHealth::Good);
        assert_eq!(CreditHealth::from_score(749), CreditHealth::Good);
        assert_eq!(CreditHealth::from_score(750), CreditHealth::Excellent);
        assert_eq!(CreditHealth::from_score(900), CreditHealth::Excellent);
    }

    #[test]
    fn test_analysis_carries_actions() {
        let analysis = analyze_credit_score(250).unwrap();
        assert_eq!(analysis.health, CreditHealth::Poor);
        assert_eq!(analysis.recommended_actions.len(), 3);
        assert_eq!(analysis.recommended_actions[0], "Pay all bills on time");

        let analysis = analyze_credit_score(780).unwrap();
        assert_eq!(analysis.health.to_string(), "excellent");
        assert_eq!(analysis.recommended_actions.len(), 2);
    }

    #[test]
    fn test_score_above_range_rejected() {
        let err = analyze_credit_score(901).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_health_serializes_snake_case() {
        let json = serde_json::to_value(analyze_credit_score(650).unwrap()).unwrap();
        assert_eq!(json["health"], "good");
        assert_eq!(json["score"], 650);
    }
}
