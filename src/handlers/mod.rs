pub mod audit;
pub mod auth;
pub mod compliance;
pub mod consent;
pub mod files;
pub mod orders;
pub mod plans;
pub mod products;

use axum::body::Body;
use axum::http::header;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::ApiError;
use crate::store::StoreError;

/// Build a file-download response: Content-Type, attachment disposition and
/// an explicit Content-Length around the raw text body.
pub(crate) fn attachment(
    filename: &str,
    content_type: &str,
    body: String,
) -> Result<Response, ApiError> {
    let safe_name: String = filename.chars().filter(|c| *c != '"').collect();
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", safe_name),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build download response");
            ApiError::internal("Failed to build download response")
        })
}

/// Accepts either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date
/// (interpreted as midnight UTC, matching how the range boundaries behave
/// everywhere else).
pub(crate) fn parse_date_param(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(ApiError::bad_request(format!(
        "Invalid date value for {}: {}",
        field, value
    )))
}

/// Translate a store miss into a resource-specific 404 while passing every
/// other store error through untouched.
pub(crate) fn map_not_found(err: StoreError, message: &'static str) -> ApiError {
    match err {
        StoreError::NotFound(_) => ApiError::not_found(message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_resolve_to_midnight_utc() {
        let dt = parse_date_param("date_from", "2024-01-31").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-31T00:00:00+00:00");
    }

    #[test]
    fn rfc3339_values_pass_through() {
        let dt = parse_date_param("date_from", "2024-01-31T10:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-31T08:30:00+00:00");
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(parse_date_param("date_from", "last tuesday").is_err());
    }

    #[test]
    fn attachment_sets_download_headers() {
        let response = attachment("report \"x\".txt", "text/plain", "hello".to_string()).unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report x.txt\""
        );
        assert_eq!(headers[header::CONTENT_LENGTH], "5");
    }
}
