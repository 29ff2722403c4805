use chrono::{DateTime, Duration, Utc};

use super::ComplianceMetrics;

/// Render the full compliance report text. Pure: the generation timestamp is
/// a parameter so identical inputs produce identical documents.
pub fn render_report(
    metrics: &ComplianceMetrics,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    generated_at: DateTime<Utc>,
) -> String {
    let next_review = generated_at + Duration::days(90);

    format!(
        r#"GDPR COMPLIANCE REPORT
======================

Report Generated: {generated}
Report Period: {start} to {end}
Report Type: E-commerce GDPR Compliance

EXECUTIVE SUMMARY
-----------------
This report provides an overview of GDPR compliance activities and metrics
for the specified period. The report covers user registrations, consent
management, data subject requests, and overall compliance score.

COMPLIANCE METRICS
------------------
Total Users Registered: {total_users}
Active Consents: {active_consents}
Data Subject Requests: {data_requests}
Orders Processed: {orders}
Unprocessed Requests: {unprocessed_requests}
Compliance Score: {score}%

GDPR ARTICLE COMPLIANCE
-----------------------
Article 6 (Lawful Basis): ✓ Implemented
Article 7 (Consent): ✓ Implemented with tracking
Article 12 (Transparent Information): ✓ Privacy policy updated
Article 13 (Information to be Provided): ✓ Data collection notices
Article 15 (Right of Access): ✓ Automated processing
Article 16 (Right to Rectification): ✓ User profile updates
Article 17 (Right to Erasure): ✓ Automated with legal basis checks
Article 18 (Right to Restriction): ⚠ Manual processing required
Article 20 (Right to Data Portability): ✓ JSON export available
Article 25 (Privacy by Design): ✓ Implemented in architecture
Article 32 (Security of Processing): ✓ Encryption and access controls
Article 33 (Breach Notification): ✓ Automated alerting system
Article 35 (Data Protection Impact Assessment): ✓ Completed

DATA PROCESSING ACTIVITIES
---------------------------
1. User Account Management
   - Legal Basis: Consent (Article 6(1)(a))
   - Data Categories: Personal identification, contact information
   - Retention Period: 3 years from last activity
   - Security Measures: Encryption at rest and in transit

2. Order Processing
   - Legal Basis: Contract (Article 6(1)(b))
   - Data Categories: Transaction data, shipping information
   - Retention Period: 7 years (tax law requirements)
   - Security Measures: Payment data tokenization

3. Marketing Communications
   - Legal Basis: Consent (Article 6(1)(a))
   - Data Categories: Email, preferences
   - Retention Period: Until consent withdrawn
   - Security Measures: Opt-out mechanisms

RISK ASSESSMENT
---------------
Low Risk:
- User consent management system operational
- Data retention policies automated
- Security measures implemented

Medium Risk:
- Manual processing for some data subject requests
- Third-party integrations require monitoring

High Risk:
- None identified in current period

RECOMMENDATIONS
---------------
1. Implement automated processing for Article 18 requests
2. Conduct quarterly staff training on GDPR procedures
3. Review third-party processor agreements annually
4. Update privacy policy to reflect any system changes
5. Conduct penetration testing bi-annually

CONCLUSION
----------
The organization demonstrates strong GDPR compliance with a score of {score}%.
All critical data subject rights are implemented and functioning correctly.
Continued monitoring and improvement of processes is recommended.

---
Report prepared by: Automated GDPR Compliance System
Next review date: {next_review}"#,
        generated = generated_at.to_rfc3339(),
        start = start.to_rfc3339(),
        end = end.to_rfc3339(),
        total_users = metrics.total_users,
        active_consents = metrics.active_consents,
        data_requests = metrics.data_requests,
        orders = metrics.orders,
        unprocessed_requests = metrics.unprocessed_requests,
        score = metrics.compliance_score,
        next_review = next_review.to_rfc3339(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{compliance_score, ReportPeriod};
    use chrono::TimeZone;

    fn metrics(pending: i64) -> ComplianceMetrics {
        ComplianceMetrics {
            total_users: 42,
            active_consents: 37,
            data_requests: 5,
            orders: 118,
            unprocessed_requests: pending,
            compliance_score: compliance_score(pending),
            report_period: ReportPeriod {
                start: "2024-01-01T00:00:00.000Z".to_string(),
                end: "2024-01-31T00:00:00.000Z".to_string(),
            },
        }
    }

    #[test]
    fn report_contains_metrics_and_score() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();

        let content = render_report(&metrics(3), start, end, now);
        assert!(content.starts_with("GDPR COMPLIANCE REPORT"));
        assert!(content.contains("Total Users Registered: 42"));
        assert!(content.contains("Orders Processed: 118"));
        assert!(content.contains("Compliance Score: 85%"));
        // 90 days after generation
        assert!(content.contains("Next review date: 2024-05-01T09:00:00+00:00"));
    }

    #[test]
    fn identical_inputs_render_identical_reports() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        assert_eq!(
            render_report(&metrics(0), start, end, now),
            render_report(&metrics(0), start, end, now)
        );
    }
}
