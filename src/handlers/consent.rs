//! Consent management and GDPR data subject requests. Consent records and
//! data requests are append-only; user erasure is a soft-disable.

use axum::extract::{Json, State};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models::{
    self, kind, AuditLogEntry, ComplianceFile, ConsentRecord, DataRequest, User,
};
use crate::privacy;
use crate::state::AppState;
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsentRequest {
    pub user_id: Option<String>,
    pub consent_type: Option<String>,
    pub consent_given: Option<bool>,
    pub consent_version: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// POST /api/consents
pub async fn update_consent(
    State(state): State<AppState>,
    Json(body): Json<UpdateConsentRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    if body.user_id.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("userId"));
    }
    if body.consent_type.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("consentType"));
    }
    if body.consent_given.is_none() {
        errors.push(FieldError::missing("consentGiven"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user_id = body.user_id.unwrap_or_default();
    let consent_type = body.consent_type.unwrap_or_default();
    let consent_given = body.consent_given.unwrap_or(false);

    let record = ConsentRecord {
        kind: kind::CONSENT_RECORD.to_string(),
        user_id: user_id.clone(),
        consent_type: consent_type.clone(),
        consent_given,
        consent_version: body.consent_version.clone(),
        is_active: true,
        ip_address: body.ip_address,
        user_agent: body.user_agent,
        created_at: models::now_timestamp(),
    };
    state
        .store
        .insert(&Uuid::new_v4().to_string(), &serde_json::to_value(&record)?)
        .await?;

    write_audit(
        &state.store,
        Some(user_id),
        "consent_updated",
        json!({
            "consentType": consent_type.clone(),
            "consentGiven": consent_given,
            "consentVersion": body.consent_version,
        }),
    )
    .await?;

    Ok(Json(json!({
        "message": "Consent updated successfully",
        "consentType": consent_type,
        "consentGiven": consent_given,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSubjectRequest {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub request_type: Option<String>,
}

/// POST /api/data-requests
///
/// `access` and `erasure` are processed inline; rectification, restriction
/// and portability are recorded as pending for manual processing, which is
/// what the compliance score counts against.
pub async fn handle_data_subject_request(
    State(state): State<AppState>,
    Json(body): Json<DataSubjectRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    if body.user_id.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("userId"));
    }
    if body.request_type.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("requestType"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user_id = body.user_id.unwrap_or_default();
    let request_type = body.request_type.unwrap_or_default();

    match request_type.as_str() {
        "access" => handle_access(&state, user_id, body.user_email).await,
        "erasure" => handle_erasure(&state, user_id, body.user_email).await,
        "rectification" | "restriction" | "portability" => {
            handle_manual(&state, user_id, body.user_email, request_type).await
        }
        _ => Err(ApiError::bad_request(format!(
            "Unsupported request type: {}",
            request_type
        ))),
    }
}

/// Compile everything stored about the user into a JSON export file with a
/// 90-day download window.
async fn handle_access(
    state: &AppState,
    user_id: String,
    user_email: Option<String>,
) -> Result<Json<Value>, ApiError> {
    let user = match state.store.get(&user_id).await {
        Ok(mut doc) => {
            // The export is user-facing; the hash stays internal.
            if let Some(map) = doc.as_object_mut() {
                map.remove("password");
            }
            doc
        }
        Err(StoreError::NotFound(_)) => Value::Null,
        Err(other) => return Err(other.into()),
    };

    let orders = collect_docs(&state.store, kind::ORDER, "userId", &user_id).await?;
    let orders: Vec<Value> = orders
        .into_iter()
        .map(|doc| {
            let mut order: models::Order = serde_json::from_value(doc)?;
            privacy::redact_order(&mut order);
            serde_json::to_value(order)
        })
        .collect::<Result<_, _>>()?;
    let consents = collect_docs(&state.store, kind::CONSENT_RECORD, "userId", &user_id).await?;

    let export = json!({
        "userId": user_id,
        "user": user,
        "orders": orders,
        "consents": consents,
        "exportedAt": models::now_timestamp(),
    });
    let content = serde_json::to_string_pretty(&export)?;

    let now = chrono::Utc::now();
    let file_id = Uuid::new_v4().to_string();
    let file = ComplianceFile {
        kind: kind::COMPLIANCE_FILE.to_string(),
        file_name: format!("data_export_{}.json", file_id),
        size: content.len() as u64,
        content,
        content_type: "application/json".to_string(),
        user_id: user_id.clone(),
        created_at: models::format_timestamp(now),
        expires_at: models::format_timestamp(now + chrono::Duration::days(90)),
    };
    state.store.insert(&file_id, &serde_json::to_value(&file)?).await?;

    let request_id = record_request(
        &state.store,
        &user_id,
        user_email,
        "access",
        "completed",
        None,
    )
    .await?;
    write_audit(
        &state.store,
        Some(user_id),
        "data_request_access",
        json!({ "requestId": request_id.clone(), "exportFileId": file_id.clone() }),
    )
    .await?;

    let download_url = format!("/api/compliance-files/{}/download", file_id);
    Ok(Json(json!({
        "requestId": request_id,
        "status": "completed",
        "downloadUrl": download_url,
        "message": "Data access request processed",
    })))
}

/// Soft-disable the account unless order retention forbids erasure.
async fn handle_erasure(
    state: &AppState,
    user_id: String,
    user_email: Option<String>,
) -> Result<Json<Value>, ApiError> {
    let order_count = state
        .store
        .query(kind::ORDER)
        .eq("userId", json!(user_id.clone()))
        .count()
        .await?;

    if order_count > 0 {
        let reason = "Order records must be retained for 7 years (legal obligation)";
        let request_id = record_request(
            &state.store,
            &user_id,
            user_email,
            "erasure",
            "rejected",
            Some(reason.to_string()),
        )
        .await?;
        write_audit(
            &state.store,
            Some(user_id),
            "data_request_erasure",
            json!({ "requestId": request_id.clone(), "outcome": "rejected" }),
        )
        .await?;
        return Ok(Json(json!({
            "requestId": request_id,
            "status": "rejected",
            "reason": reason,
        })));
    }

    let doc = state
        .store
        .get(&user_id)
        .await
        .map_err(|e| super::map_not_found(e, "User not found"))?;
    let mut user: User = serde_json::from_value(doc)?;
    user.is_active = false;
    user.updated_at = models::now_timestamp();
    state.store.upsert(&user_id, &serde_json::to_value(&user)?).await?;

    let request_id = record_request(
        &state.store,
        &user_id,
        user_email,
        "erasure",
        "completed",
        None,
    )
    .await?;
    write_audit(
        &state.store,
        Some(user_id),
        "data_request_erasure",
        json!({ "requestId": request_id.clone(), "outcome": "completed" }),
    )
    .await?;

    Ok(Json(json!({
        "requestId": request_id,
        "status": "completed",
        "message": "Account deactivated and scheduled for erasure",
    })))
}

async fn handle_manual(
    state: &AppState,
    user_id: String,
    user_email: Option<String>,
    request_type: String,
) -> Result<Json<Value>, ApiError> {
    let request_id = record_request(
        &state.store,
        &user_id,
        user_email,
        &request_type,
        "pending",
        None,
    )
    .await?;
    write_audit(
        &state.store,
        Some(user_id),
        &format!("data_request_{}", request_type),
        json!({ "requestId": request_id.clone(), "outcome": "pending" }),
    )
    .await?;

    Ok(Json(json!({
        "requestId": request_id,
        "status": "pending",
        "message": "Request recorded for manual processing",
    })))
}

async fn record_request(
    store: &DocumentStore,
    user_id: &str,
    user_email: Option<String>,
    request_type: &str,
    status: &str,
    reason: Option<String>,
) -> Result<String, ApiError> {
    let now = models::now_timestamp();
    let request = DataRequest {
        kind: kind::DATA_REQUEST.to_string(),
        user_id: user_id.to_string(),
        user_email,
        request_type: request_type.to_string(),
        status: status.to_string(),
        request_date: now.clone(),
        completed_date: (status == "completed").then_some(now),
        reason,
    };
    let id = Uuid::new_v4().to_string();
    store.insert(&id, &serde_json::to_value(&request)?).await?;
    Ok(id)
}

async fn collect_docs(
    store: &DocumentStore,
    doc_kind: &str,
    field: &str,
    value: &str,
) -> Result<Vec<Value>, ApiError> {
    let rows = store.query(doc_kind).eq(field, json!(value)).fetch().await?;
    Ok(rows.into_iter().map(|row| row.doc).collect())
}

pub(super) async fn write_audit(
    store: &DocumentStore,
    user_id: Option<String>,
    action: &str,
    details: Value,
) -> Result<(), ApiError> {
    let entry = AuditLogEntry::new(user_id, action, details);
    store
        .insert(&Uuid::new_v4().to_string(), &serde_json::to_value(&entry)?)
        .await?;
    Ok(())
}
