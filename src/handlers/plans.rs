//! Project-plan endpoints: generate-and-store, per-user history, and the
//! plan download that accepts its parameters from either the query string
//! (GET) or the JSON body (POST), resolved into one shared parameter set.

use axum::extract::{Json, Query, State};
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models::{self, kind};
use crate::planner::{self, PlanRequest};
use crate::state::AppState;
use crate::store::query::SortDirection;

const PROJECT_HISTORY_LIMIT: i64 = 10;

/// Raw plan parameters as they arrive from the query string or body.
#[derive(Debug, Deserialize)]
pub struct PlanParams {
    pub project_name: Option<String>,
    pub project_type: Option<String>,
    pub complexity: Option<String>,
    pub tech_stack: Option<String>,
    pub deadline_weeks: Option<u32>,
    pub user_id: Option<String>,
}

impl PlanParams {
    /// Presence-check the required fields and apply the defaults; the
    /// deadline default differs between the create (4) and download (8)
    /// paths.
    fn resolve(self, default_weeks: u32) -> Result<(PlanRequest, String), ApiError> {
        let mut errors = Vec::new();
        if self.project_name.as_deref().map(str::is_empty).unwrap_or(true) {
            errors.push(FieldError::missing("project_name"));
        }
        if self.project_type.as_deref().map(str::is_empty).unwrap_or(true) {
            errors.push(FieldError::missing("project_type"));
        }
        if self.complexity.as_deref().map(str::is_empty).unwrap_or(true) {
            errors.push(FieldError::missing("complexity"));
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let request = PlanRequest {
            project_name: self.project_name.unwrap_or_default(),
            project_type: self.project_type.unwrap_or_default(),
            complexity: self.complexity.unwrap_or_default(),
            tech_stack: self
                .tech_stack
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "not specified".to_string()),
            deadline_weeks: self.deadline_weeks.unwrap_or(default_weeks),
        };
        let user_id = self
            .user_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "anonymous".to_string());
        Ok((request, user_id))
    }
}

/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    Json(params): Json<PlanParams>,
) -> Result<Json<Value>, ApiError> {
    let (request, user_id) = params.resolve(4)?;
    let plan = planner::collect_requirements(&request, Utc::now());

    let mut doc = serde_json::to_value(&plan)?;
    if let Some(map) = doc.as_object_mut() {
        map.insert("type".to_string(), json!(kind::PROJECT_REQUIREMENT));
        map.insert("user_id".to_string(), json!(user_id));
        map.insert("created_at".to_string(), json!(models::now_timestamp()));
    }

    let id = Uuid::new_v4().to_string();
    state.store.insert(&id, &doc).await?;

    let mut response = json!({ "id": id });
    if let (Some(response_map), Some(plan_map)) = (response.as_object_mut(), doc.as_object()) {
        for (key, value) in plan_map {
            if key != "type" {
                response_map.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ProjectHistoryQuery {
    pub user_id: Option<String>,
}

/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<ProjectHistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = params
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing user_id parameter"))?;

    let rows = state
        .store
        .query(kind::PROJECT_REQUIREMENT)
        .eq("user_id", json!(user_id))
        .order_by("created_at", SortDirection::Desc)
        .limit(PROJECT_HISTORY_LIMIT)
        .fetch()
        .await?;

    let projects: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            let mut doc = row.doc;
            if let Some(map) = doc.as_object_mut() {
                map.insert("id".to_string(), json!(row.id));
            }
            doc
        })
        .collect();

    Ok(Json(json!({ "projects": projects })))
}

/// GET /api/plans/download, parameters from the query string.
pub async fn download_plan_query(
    State(_state): State<AppState>,
    Query(params): Query<PlanParams>,
) -> Result<Response, ApiError> {
    respond_with_plan(params)
}

/// POST /api/plans/download, parameters from the JSON body.
pub async fn download_plan_body(
    State(_state): State<AppState>,
    Json(params): Json<PlanParams>,
) -> Result<Response, ApiError> {
    respond_with_plan(params)
}

fn respond_with_plan(params: PlanParams) -> Result<Response, ApiError> {
    let (request, _user_id) = params.resolve(8)?;
    let plan = planner::collect_requirements(&request, Utc::now());
    super::attachment(&plan.plan_filename, "text/plain", plan.text_plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: Option<&str>) -> PlanParams {
        PlanParams {
            project_name: name.map(str::to_string),
            project_type: Some("webapp".to_string()),
            complexity: Some("medium".to_string()),
            tech_stack: None,
            deadline_weeks: None,
            user_id: None,
        }
    }

    #[test]
    fn resolve_applies_defaults() {
        let (request, user_id) = params(Some("Atlas")).resolve(8).unwrap();
        assert_eq!(request.tech_stack, "not specified");
        assert_eq!(request.deadline_weeks, 8);
        assert_eq!(user_id, "anonymous");
    }

    #[test]
    fn resolve_rejects_missing_required_fields() {
        let err = params(None).resolve(4).unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "project_name");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
