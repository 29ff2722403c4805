use chrono::{TimeZone, Utc};

use storefront_api::compliance::{compliance_score, render_report, ComplianceMetrics, ReportPeriod};

fn metrics(pending: i64) -> ComplianceMetrics {
    ComplianceMetrics {
        total_users: 120,
        active_consents: 96,
        data_requests: pending + 2,
        orders: 340,
        unprocessed_requests: pending,
        compliance_score: compliance_score(pending),
        report_period: ReportPeriod {
            start: "2024-01-01T00:00:00.000Z".to_string(),
            end: "2024-01-31T00:00:00.000Z".to_string(),
        },
    }
}

#[test]
fn three_pending_requests_score_85() {
    assert_eq!(compliance_score(3), 85);
}

#[test]
fn score_floors_at_zero_from_twenty_pending_on() {
    assert_eq!(compliance_score(20), 0);
    assert_eq!(compliance_score(21), 0);
    assert_eq!(compliance_score(50), 0);
}

#[test]
fn report_embeds_every_metric() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 2, 15, 10, 0, 0).unwrap();

    let content = render_report(&metrics(3), start, end, now);

    assert!(content.contains("Total Users Registered: 120"));
    assert!(content.contains("Active Consents: 96"));
    assert!(content.contains("Data Subject Requests: 5"));
    assert!(content.contains("Orders Processed: 340"));
    assert!(content.contains("Unprocessed Requests: 3"));
    assert!(content.contains("Compliance Score: 85%"));
    assert!(content.contains("Report Period: 2024-01-01T00:00:00+00:00 to 2024-01-31T00:00:00+00:00"));

    for section in [
        "EXECUTIVE SUMMARY",
        "COMPLIANCE METRICS",
        "GDPR ARTICLE COMPLIANCE",
        "DATA PROCESSING ACTIVITIES",
        "RISK ASSESSMENT",
        "RECOMMENDATIONS",
        "CONCLUSION",
    ] {
        assert!(content.contains(section), "missing section: {}", section);
    }
}

#[test]
fn serialized_metrics_use_the_wire_field_names() {
    let value = serde_json::to_value(metrics(0)).unwrap();
    assert_eq!(value["totalUsers"], 120);
    assert_eq!(value["activeConsents"], 96);
    assert_eq!(value["complianceScore"], 100);
    assert!(value["reportPeriod"]["start"].is_string());
}
