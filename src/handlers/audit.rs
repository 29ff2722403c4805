//! Read access to the append-only audit trail.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::kind;
use crate::state::AppState;
use crate::store::query::SortDirection;

const DEFAULT_AUDIT_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    pub action: Option<String>,
}

/// GET /api/audit
pub async fn get_audit_trail(
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = params
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing userId parameter"))?;

    let mut query = state
        .store
        .query(kind::AUDIT_LOG)
        .eq("userId", json!(user_id))
        .order_by("timestamp", SortDirection::Desc)
        .limit(params.limit.unwrap_or(DEFAULT_AUDIT_LIMIT));

    if let Some(action) = params.action.filter(|v| !v.is_empty()) {
        query = query.eq("action", json!(action));
    }

    let entries: Vec<Value> = query.fetch().await?.into_iter().map(|row| row.doc).collect();
    let total = entries.len();

    Ok(Json(json!({
        "auditEntries": entries,
        "total": total,
        "userId": user_id,
    })))
}
