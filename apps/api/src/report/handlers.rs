//! Axum route handler for compliance report generation.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::report::ComplianceReport;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub filename: String,
}

/// POST /api/v1/reports
///
/// Scores the latest stored assessment for the document and persists the
/// resulting report next to it.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ComplianceReport>, AppError> {
    if request.filename.is_empty() {
        return Err(AppError::Validation("Filename is required".to_string()));
    }

    let path = state
        .store
        .find_latest_assessment(&request.filename)
        .ok_or_else(|| {
            AppError::NotFound("No assessment found. Please analyze a document first.".to_string())
        })?;

    let assessments = state.store.load_assessments(&path)?;
    let with_level = assessments
        .iter()
        .filter(|a| a.selected_maturity_level.is_some())
        .count();
    let with_score = assessments
        .iter()
        .filter(|a| a.calculated_score.is_some())
        .count();
    info!(
        "Scoring {} clauses ({with_level} with a selected level, {with_score} with practice scores)",
        assessments.len()
    );

    let report = state.scorer.score(&assessments);
    state.store.save_report(&request.filename, &report)?;
    info!(
        "Report generated: {} at {:.1}%",
        report.overall_maturity_score, report.overall_percentage_score
    );

    Ok(Json(report))
}

#[derive(Debug, serde::Deserialize)]
pub struct LatestReportQuery {
    #[serde(default)]
    pub filename: String,
}

/// GET /api/v1/reports/latest
///
/// Returns the most recently generated report for the document without
/// rescoring.
pub async fn handle_latest_report(
    State(state): State<AppState>,
    Query(query): Query<LatestReportQuery>,
) -> Result<Json<ComplianceReport>, AppError> {
    let path = state
        .store
        .find_latest_report(&query.filename)
        .ok_or_else(|| {
            AppError::NotFound("No compliance report found. Please generate one first.".to_string())
        })?;
    let report = state.store.load_report(&path)?;
    Ok(Json(report))
}
