//! Catalog handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use goalpath_core::InvestmentOption;

use crate::AppState;

/// GET /api/catalog - List the investment options in tie-break order
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<InvestmentOption>> {
    Json(state.config.catalog.to_vec())
}
