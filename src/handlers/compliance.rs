//! Compliance report generation and expiring downloads.

use axum::extract::{Json, Path, State};
use axum::response::Response;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::compliance::{self, render_report};
use crate::error::{ApiError, FieldError};
use crate::models::{self, kind, ComplianceFile, ComplianceReport};
use crate::state::AppState;

/// Reports and export files are readable for 90 days after creation.
const EXPIRY_DAYS: i64 = 90;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// POST /api/reports/compliance
pub async fn generate_report(
    State(state): State<AppState>,
    Json(body): Json<GenerateReportRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    if body.report_type.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("reportType"));
    }
    if body.start_date.is_none() {
        errors.push(FieldError::missing("startDate"));
    }
    if body.end_date.is_none() {
        errors.push(FieldError::missing("endDate"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let report_type = body.report_type.unwrap_or_default();
    let start = super::parse_date_param("startDate", &body.start_date.unwrap_or_default())?;
    let end = super::parse_date_param("endDate", &body.end_date.unwrap_or_default())?;

    let metrics = compliance::generate_metrics(&state.store, start, end).await?;
    let now = Utc::now();
    let content = render_report(&metrics, start, end, now);

    let report = ComplianceReport {
        kind: kind::COMPLIANCE_REPORT.to_string(),
        report_type,
        start_date: models::format_timestamp(start),
        end_date: models::format_timestamp(end),
        metrics: serde_json::to_value(&metrics)?,
        size: content.len() as u64,
        content,
        content_type: "text/plain".to_string(),
        created_at: models::format_timestamp(now),
        expires_at: models::format_timestamp(now + Duration::days(EXPIRY_DAYS)),
    };

    let report_id = Uuid::new_v4().to_string();
    state
        .store
        .insert(&report_id, &serde_json::to_value(&report)?)
        .await?;
    let download_url = format!("/api/reports/compliance/{}/download", report_id);

    Ok(Json(json!({
        "reportId": report_id,
        "metrics": metrics,
        "downloadUrl": download_url,
        "message": "GDPR compliance report generated successfully",
    })))
}

/// GET /api/reports/compliance/:id/download
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let doc = state
        .store
        .get(&id)
        .await
        .map_err(|e| super::map_not_found(e, "Report not found"))?;
    let report: ComplianceReport = serde_json::from_value(doc)?;
    if report.kind != kind::COMPLIANCE_REPORT {
        return Err(ApiError::not_found("Report not found"));
    }
    if is_expired(&report.expires_at) {
        return Err(ApiError::gone("Report has expired"));
    }

    super::attachment(
        &format!("gdpr_compliance_report_{}.txt", id),
        &report.content_type,
        report.content,
    )
}

/// GET /api/compliance-files/:id/download
pub async fn download_compliance_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let doc = state
        .store
        .get(&id)
        .await
        .map_err(|e| super::map_not_found(e, "File not found"))?;
    let file: ComplianceFile = serde_json::from_value(doc)?;
    if file.kind != kind::COMPLIANCE_FILE {
        return Err(ApiError::not_found("File not found"));
    }
    if is_expired(&file.expires_at) {
        return Err(ApiError::gone("File has expired"));
    }

    super::attachment(&file.file_name, &file.content_type, file.content)
}

/// Expiry timestamps share the fixed-width storage format, so a plain string
/// comparison against "now" is a chronological comparison.
fn is_expired(expires_at: &str) -> bool {
    expires_at < models::now_timestamp().as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_timestamps_are_expired() {
        assert!(is_expired("2020-01-01T00:00:00.000Z"));
        assert!(!is_expired("2999-01-01T00:00:00.000Z"));
    }
}
