use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document kind discriminators. Every persisted document carries one in its
/// `type` field, which is covered by a secondary index.
pub mod kind {
    pub const USER: &str = "user";
    pub const FILE: &str = "file";
    pub const ORDER: &str = "order";
    pub const CONSENT_RECORD: &str = "consent_record";
    pub const DATA_REQUEST: &str = "data_request";
    pub const AUDIT_LOG: &str = "audit_log";
    pub const COMPLIANCE_REPORT: &str = "compliance_report";
    pub const COMPLIANCE_FILE: &str = "compliance_file";
    pub const PRODUCT: &str = "product";
    pub const PROJECT_REQUIREMENT: &str = "project_requirement";
}

/// Timestamps are persisted as fixed-width RFC 3339 UTC strings so that
/// string comparison is chronological.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Registered account. Keyed by `"user::" + email`; the password field holds
/// a bcrypt hash, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub addresses: Vec<Value>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub preferences: Value,
}

/// Public-safe account summary returned by the auth endpoints. Never carries
/// the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl User {
    pub fn document_key(email: &str) -> String {
        format!("user::{}", email)
    }

    pub fn summary(&self, id: &str) -> UserSummary {
        UserSummary {
            id: id.to_string(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
        }
    }
}

/// Stored text file. Field names keep the snake_case layout the file
/// documents were originally persisted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub filename: String,
    pub content: String,
    pub content_type: String,
    pub size: u64,
    pub user_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub metadata: Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Order record, created by an external system and read-only here. Unknown
/// fields are preserved through the `extra` map so reads do not drop data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Consent records are append-only: a new record is written on every consent
/// change, prior records are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    pub consent_type: String,
    pub consent_given: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_version: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: String,
}

/// GDPR data subject request. Status is one of `pending`, `completed`,
/// `rejected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub request_type: String,
    pub status: String,
    pub request_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Append-only audit trail entry, written on every privacy-relevant action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub action: String,
    #[serde(default)]
    pub details: Value,
    pub timestamp: String,
    pub gdpr_compliant: bool,
}

impl AuditLogEntry {
    pub fn new(user_id: Option<String>, action: &str, details: Value) -> Self {
        Self {
            kind: kind::AUDIT_LOG.to_string(),
            user_id,
            action: action.to_string(),
            details,
            timestamp: now_timestamp(),
            gdpr_compliant: true,
        }
    }
}

/// Generated compliance report; immutable once written, expires 90 days
/// after creation (checked at read, never actively purged).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    #[serde(rename = "type")]
    pub kind: String,
    pub report_type: String,
    pub start_date: String,
    pub end_date: String,
    pub metrics: Value,
    pub content: String,
    pub content_type: String,
    pub size: u64,
    pub created_at: String,
    pub expires_at: String,
}

/// Data-export file produced by an access request; same expiry contract as
/// compliance reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceFile {
    #[serde(rename = "type")]
    pub kind: String,
    pub file_name: String,
    pub content: String,
    pub content_type: String,
    pub size: u64,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Catalog product, searched but never written by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width_and_sortable() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 31, 10, 30, 0).unwrap();
        let a = format_timestamp(earlier);
        let b = format_timestamp(later);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn user_key_is_derived_from_email() {
        assert_eq!(User::document_key("a@b.se"), "user::a@b.se");
    }

    #[test]
    fn user_serializes_camel_case_and_summary_drops_hash() {
        let user = User {
            kind: kind::USER.to_string(),
            email: "a@b.se".to_string(),
            password: "$2b$12$hash".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Berg".to_string(),
            role: "customer".to_string(),
            is_active: true,
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
            last_login: None,
            profile: UserProfile::default(),
        };
        let doc = serde_json::to_value(&user).unwrap();
        assert_eq!(doc["type"], "user");
        assert!(doc.get("firstName").is_some());
        assert!(doc.get("isActive").is_some());

        let summary = serde_json::to_value(user.summary("user::a@b.se")).unwrap();
        assert!(summary.get("password").is_none());
        assert_eq!(summary["id"], "user::a@b.se");
    }

    #[test]
    fn order_round_trip_preserves_unknown_fields() {
        let raw = serde_json::json!({
            "type": "order",
            "userId": "user::a@b.se",
            "orderNumber": "ORD-1001",
            "status": "shipped",
            "totalAmount": 149.97,
            "currency": "EUR",
            "items": [{"productId": "prod_123"}]
        });
        let order: Order = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["totalAmount"], 149.97);
        assert_eq!(back["items"][0]["productId"], "prod_123");
        assert_eq!(back["orderNumber"], "ORD-1001");
    }
}
