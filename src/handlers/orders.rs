//! Read-only order access with payment redaction, address hashing and audit
//! logging. Orders are created by an external system.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{kind, AuditLogEntry, Order};
use crate::privacy;
use crate::state::AppState;
use crate::store::query::SortDirection;

const DEFAULT_ORDER_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// GET /api/orders
pub async fn get_user_orders(
    State(state): State<AppState>,
    Query(params): Query<OrdersQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = params
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing userId parameter"))?;

    let mut query = state
        .store
        .query(kind::ORDER)
        .eq("userId", json!(user_id))
        .order_by("createdAt", SortDirection::Desc)
        .limit(params.limit.unwrap_or(DEFAULT_ORDER_LIMIT));

    if let Some(status) = params.status.filter(|v| !v.is_empty()) {
        query = query.eq("status", json!(status));
    }

    let rows = query.fetch().await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let mut order: Order = serde_json::from_value(row.doc)?;
        privacy::redact_order(&mut order);
        orders.push(order);
    }

    let audit = AuditLogEntry::new(
        Some(user_id.clone()),
        "orders_accessed",
        json!({ "orderCount": orders.len(), "accessMethod": "api_query" }),
    );
    state
        .store
        .insert(&Uuid::new_v4().to_string(), &serde_json::to_value(&audit)?)
        .await?;

    let total = orders.len();
    Ok(Json(json!({
        "orders": orders,
        "total": total,
        "userId": user_id,
    })))
}
