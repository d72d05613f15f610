use crate::config::Config;
use crate::errors::AppError;
use crate::geo_engine;
use crate::ml_engine;
use crate::models::ReportStatus;
use crate::repository::LeadRepository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    fn repository(&self) -> LeadRepository {
        LeadRepository::new(self.db.clone())
    }
}

fn failed_response(error: &Option<String>) -> Response {
    let message = error
        .clone()
        .unwrap_or_else(|| "Analysis failed".to_string());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

/// GET /
///
/// Service information and endpoint map.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Lead Intelligence API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "description": "Lead intelligence platform with ML models and geographical analysis",
        "features": {
            "ml_models": [
                "Lead Scoring",
                "Churn Risk Prediction",
                "Lead Segmentation",
                "Smart Recommendations"
            ],
            "geographical_analysis": [
                "Country Performance",
                "Market Recommendations",
                "Market Concentration"
            ]
        },
        "endpoints": {
            "ml_complete": "POST /api/v1/score-all-leads",
            "ml_summary": "GET /api/v1/summary",
            "ml_top_leads": "GET /api/v1/top-leads/{limit}",
            "ml_at_risk": "GET /api/v1/at-risk-leads",
            "ml_recommendations": "GET /api/v1/recommendations",
            "geo_complete": "POST /api/v1/geographical-analysis",
            "geo_countries": "GET /api/v1/countries",
            "geo_recommendations": "GET /api/v1/market-recommendations",
            "health": "GET /health"
        }
    }))
}

/// GET /health
///
/// Verifies API and lead-store connectivity. Always answers 200 with the
/// probe result so orchestrators can read the body.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            "disconnected"
        }
    };

    let healthy = db_status == "connected";
    (
        StatusCode::OK,
        Json(json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "service": "lead-intel-api",
            "version": env!("CARGO_PKG_VERSION"),
            "database": db_status,
        })),
    )
}

/// POST /api/v1/score-all-leads
///
/// Runs the complete lead-intelligence pipeline and returns the full report.
pub async fn score_all_leads(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!("Running complete ML analysis on all leads");

    let report =
        ml_engine::run_lead_intelligence(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }
    (StatusCode::OK, Json(report)).into_response()
}

/// GET /api/v1/summary
///
/// High-level ML metrics only.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Response {
    let report =
        ml_engine::run_lead_intelligence(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }

    (
        StatusCode::OK,
        Json(json!({
            "summary": report.summary,
            "timestamp": report.timestamp,
            "status": "success",
        })),
    )
        .into_response()
}

/// GET /api/v1/top-leads/:limit
///
/// Highest scoring leads. Limits above the configured maximum are rejected
/// before any computation runs.
pub async fn get_top_leads(
    State(state): State<Arc<AppState>>,
    Path(limit): Path<usize>,
) -> Result<Response, AppError> {
    ml_engine::validate_top_limit(limit, &state.config.analytics)?;

    let mut report =
        ml_engine::run_lead_intelligence(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return Ok(failed_response(&report.error));
    }

    report.top_leads.truncate(limit);
    let count = report.top_leads.len();
    Ok((
        StatusCode::OK,
        Json(json!({
            "top_leads": report.top_leads,
            "count": count,
            "timestamp": report.timestamp,
            "status": "success",
        })),
    )
        .into_response())
}

/// GET /api/v1/at-risk-leads
///
/// Leads with high churn risk, most urgent first.
pub async fn get_at_risk_leads(State(state): State<Arc<AppState>>) -> Response {
    let report =
        ml_engine::run_lead_intelligence(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }

    let count = report.at_risk_leads.len();
    (
        StatusCode::OK,
        Json(json!({
            "at_risk_leads": report.at_risk_leads,
            "count": count,
            "timestamp": report.timestamp,
            "status": "success",
        })),
    )
        .into_response()
}

/// GET /api/v1/recommendations
///
/// Prioritized action items for the sales team.
pub async fn get_recommendations(State(state): State<Arc<AppState>>) -> Response {
    let report =
        ml_engine::run_lead_intelligence(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }

    let count = report.recommendations.len();
    (
        StatusCode::OK,
        Json(json!({
            "recommendations": report.recommendations,
            "count": count,
            "timestamp": report.timestamp,
            "status": "success",
        })),
    )
        .into_response()
}

/// POST /api/v1/geographical-analysis
///
/// Runs the complete geographical pipeline and returns the full report.
pub async fn geographical_analysis(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!("Running geographical analysis");

    let report =
        geo_engine::run_geographical_analysis(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }
    (StatusCode::OK, Json(report)).into_response()
}

/// GET /api/v1/countries
///
/// Country-level metrics only.
pub async fn get_countries(State(state): State<Arc<AppState>>) -> Response {
    let report =
        geo_engine::run_geographical_analysis(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }

    (
        StatusCode::OK,
        Json(json!({
            "country_analysis": report.country_analysis,
            "timestamp": report.timestamp,
            "status": "success",
        })),
    )
        .into_response()
}

/// GET /api/v1/market-recommendations
///
/// Market-specific strategic recommendations with the geo summary.
pub async fn get_market_recommendations(State(state): State<Arc<AppState>>) -> Response {
    let report =
        geo_engine::run_geographical_analysis(&state.repository(), &state.config.analytics).await;
    if report.status == ReportStatus::Failed {
        return failed_response(&report.error);
    }

    (
        StatusCode::OK,
        Json(json!({
            "recommendations": report.recommendations,
            "summary": report.summary,
            "timestamp": report.timestamp,
            "status": "success",
        })),
    )
        .into_response()
}
