//! GDPR compliance metrics and report rendering. Metric collection is four
//! independent range counts against the store; scoring and rendering are
//! pure.

pub mod report;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::{self, kind};
use crate::store::{DocumentStore, StoreError};

pub use report::render_report;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMetrics {
    pub total_users: i64,
    pub active_consents: i64,
    pub data_requests: i64,
    pub orders: i64,
    pub unprocessed_requests: i64,
    pub compliance_score: i64,
    pub report_period: ReportPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: String,
    pub end: String,
}

/// Score starts at 100 and loses 5 points per data request still pending,
/// floored at 0.
pub fn compliance_score(unprocessed_requests: i64) -> i64 {
    (100 - unprocessed_requests * 5).max(0)
}

/// Count users, active consents, data requests and orders created within
/// `[start, end]` (inclusive) via independent range queries.
pub async fn generate_metrics(
    store: &DocumentStore,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<ComplianceMetrics, StoreError> {
    let from = models::format_timestamp(start);
    let to = models::format_timestamp(end);
    let range = |field: &str, doc_kind: &str| {
        store
            .query(doc_kind)
            .date_range(field, Some(from.clone()), Some(to.clone()))
    };

    let total_users = range("createdAt", kind::USER).count().await?;
    let active_consents = range("createdAt", kind::CONSENT_RECORD)
        .eq("consentGiven", true)
        .eq("isActive", true)
        .count()
        .await?;
    let data_requests = range("requestDate", kind::DATA_REQUEST).count().await?;
    let orders = range("createdAt", kind::ORDER).count().await?;
    let unprocessed_requests = range("requestDate", kind::DATA_REQUEST)
        .eq("status", json!("pending"))
        .count()
        .await?;

    Ok(ComplianceMetrics {
        total_users,
        active_consents,
        data_requests,
        orders,
        unprocessed_requests,
        compliance_score: compliance_score(unprocessed_requests),
        report_period: ReportPeriod {
            start: from,
            end: to,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_deducts_five_per_pending_request() {
        assert_eq!(compliance_score(0), 100);
        assert_eq!(compliance_score(3), 85);
    }

    #[test]
    fn score_floors_at_zero() {
        assert_eq!(compliance_score(20), 0);
        assert_eq!(compliance_score(21), 0);
        assert_eq!(compliance_score(1000), 0);
    }
}
