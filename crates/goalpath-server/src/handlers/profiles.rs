//! Profile handlers

use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;

use crate::{parse_body, AppError};
use goalpath_core::{FinancialProfile, ProfileBuilder, ProfileOverrides, RawProfile};

/// Request body for building a profile: raw figures plus optional overrides
#[derive(Debug, Deserialize)]
pub struct BuildProfileRequest {
    #[serde(flatten)]
    pub raw: RawProfile,
    #[serde(default)]
    pub overrides: ProfileOverrides,
}

/// POST /api/profiles - Build a complete profile from partial inputs
///
/// Missing expenses are estimated from income, savings are summed from the
/// supplied balances and the risk tolerance is inferred when absent.
pub async fn build_profile(
    payload: Result<Json<BuildProfileRequest>, JsonRejection>,
) -> Result<Json<FinancialProfile>, AppError> {
    let req = parse_body(payload)?;
    let profile = ProfileBuilder::build(&req.raw, &req.overrides)?;
    Ok(Json(profile))
}
