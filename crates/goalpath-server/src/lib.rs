//! Goalpath Web Server
//!
//! Axum-based REST API over the goalpath engine.
//!
//! The server is stateless: every request carries the profile, goals and
//! as-of date the engine needs, and nothing is persisted between requests.
//! Persistence and authentication belong to whatever sits in front of it.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Security headers on every response
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info};

use goalpath_core::{EngineConfig, MilestoneTracker, ProjectionEngine};

mod handlers;

/// Shared application state, built once from the engine configuration
pub struct AppState {
    pub config: EngineConfig,
    pub engine: ProjectionEngine,
    pub tracker: MilestoneTracker,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: ProjectionEngine::from_config(&config),
            tracker: MilestoneTracker::new(config.milestones.clone()),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(config: EngineConfig) -> Router {
    let state = Arc::new(AppState::new(config));

    let api_routes = Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route("/profiles", post(handlers::build_profile))
        .route("/projections", post(handlers::create_projection))
        .route("/plans", post(handlers::create_plan))
        .route("/priorities", post(handlers::score_priority))
        .route("/milestones", post(handlers::evaluate_milestones))
        .route("/life-scenarios", post(handlers::analyze_scenarios))
        .route("/simulations", post(handlers::run_simulation))
        // Standalone calculators
        .route("/calculators/savings-goal", post(handlers::calc_savings_goal))
        .route("/calculators/loan", post(handlers::calc_loan))
        .route("/calculators/investment", post(handlers::calc_investment))
        .route("/calculators/retirement", post(handlers::calc_retirement))
        .route("/calculators/credit-health", post(handlers::calc_credit_health));

    // Restrictive default: same-origin only
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(config: EngineConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Requests without an `as_of` date are evaluated against today
pub(crate) fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Unwrap a JSON body, reporting malformed or invalid payloads as 400
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(AppError::bad_request(&rejection.body_text())),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        match err.downcast_ref::<goalpath_core::Error>() {
            Some(goalpath_core::Error::InvalidInput(msg)) => Self::bad_request(msg),
            Some(goalpath_core::Error::NotFound(msg)) => Self::not_found(msg),
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err),
            },
        }
    }
}
