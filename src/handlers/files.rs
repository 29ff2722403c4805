//! Text-file storage: save, bulk save, list, search, metadata, download and
//! owner-checked delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::models::{self, kind, FileRecord};
use crate::state::AppState;
use crate::store::query::SortDirection;

/// Hard ingress cap on file content.
const MAX_FILE_SIZE: usize = 1024 * 1024;
/// Hard cap on bulk save batches.
const MAX_BULK_FILES: usize = 10;

const DEFAULT_LIST_LIMIT: i64 = 20;

fn download_url(id: &str) -> String {
    format!("/api/files/{}/download", id)
}

/// List/search projection of a file: everything except `content`, which is
/// stripped from list views for payload size and only served by the
/// single-item and download endpoints.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub user_id: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub metadata: Value,
    pub created_at: String,
    pub updated_at: String,
    pub download_url: String,
}

impl FileSummary {
    fn from_record(id: String, record: FileRecord) -> Self {
        let download_url = download_url(&id);
        Self {
            id,
            filename: record.filename,
            content_type: record.content_type,
            size: record.size,
            user_id: record.user_id,
            tags: record.tags,
            is_public: record.is_public,
            metadata: record.metadata,
            created_at: record.created_at,
            updated_at: record.updated_at,
            download_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveFileRequest {
    pub filename: Option<String>,
    pub content: Option<String>,
    pub user_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub metadata: Option<Value>,
}

/// POST /api/files
pub async fn save_file(
    State(state): State<AppState>,
    Json(body): Json<SaveFileRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    if body.filename.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("filename"));
    }
    if body.content.as_deref().map(str::is_empty).unwrap_or(true) {
        errors.push(FieldError::missing("content"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let filename = body.filename.unwrap_or_default();
    let content = body.content.unwrap_or_default();

    // Size gate before anything is written.
    if content.len() > MAX_FILE_SIZE {
        return Err(ApiError::bad_request("File too large. Maximum size is 1MB."));
    }

    let now = models::now_timestamp();
    let size = content.len() as u64;
    let record = FileRecord {
        kind: kind::FILE.to_string(),
        filename: filename.clone(),
        content,
        content_type: "text/plain".to_string(),
        size,
        user_id: body.user_id.unwrap_or_else(|| "anonymous".to_string()),
        tags: body.tags.unwrap_or_default(),
        is_public: body.is_public.unwrap_or(false),
        metadata: body.metadata.unwrap_or_else(|| json!({})),
        created_at: now.clone(),
        updated_at: now,
    };

    let id = Uuid::new_v4().to_string();
    state.store.insert(&id, &serde_json::to_value(&record)?).await?;
    let url = download_url(&id);

    Ok(Json(json!({
        "id": id,
        "message": "File saved successfully",
        "filename": filename,
        "size": size,
        "download_url": url,
    })))
}

#[derive(Debug, Deserialize)]
pub struct BulkFileItem {
    pub filename: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct BulkSaveRequest {
    pub files: Option<Vec<BulkFileItem>>,
    pub user_id: Option<String>,
}

/// POST /api/files/bulk
///
/// All-or-nothing: every item is validated before any write is issued, and
/// the writes go out as one batch.
pub async fn bulk_save(
    State(state): State<AppState>,
    Json(body): Json<BulkSaveRequest>,
) -> Result<Json<Value>, ApiError> {
    let files = match body.files {
        Some(files) if !files.is_empty() => files,
        _ => return Err(ApiError::bad_request("Missing or invalid files array")),
    };
    let user_id = body
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing user_id"))?;

    if files.len() > MAX_BULK_FILES {
        return Err(ApiError::bad_request("Maximum 10 files per batch"));
    }

    let now = models::now_timestamp();
    let mut docs = Vec::with_capacity(files.len());
    let mut results = Vec::with_capacity(files.len());

    for item in files {
        let (filename, content) = match (item.filename, item.content) {
            (Some(filename), Some(content)) if !filename.is_empty() && !content.is_empty() => {
                (filename, content)
            }
            _ => {
                return Err(ApiError::bad_request(
                    "Invalid file: missing filename or content",
                ))
            }
        };

        let size = content.len() as u64;
        let record = FileRecord {
            kind: kind::FILE.to_string(),
            filename: filename.clone(),
            content,
            content_type: item.content_type.unwrap_or_else(|| "text/plain".to_string()),
            size,
            user_id: user_id.clone(),
            tags: item.tags.unwrap_or_default(),
            is_public: item.is_public.unwrap_or(false),
            metadata: item.metadata.unwrap_or_else(|| json!({})),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let id = Uuid::new_v4().to_string();
        docs.push((id.clone(), serde_json::to_value(&record)?));
        results.push(json!({ "id": id, "filename": filename, "size": size }));
    }

    state.store.insert_batch(&docs).await?;
    let total = results.len();

    Ok(Json(json!({
        "message": "Files saved successfully",
        "files": results,
        "total": total,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    pub user_id: Option<String>,
    /// Comma-separated tag filter, matched by set membership.
    pub tags: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<ListFilesQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing user_id parameter"))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let page = params.page.unwrap_or(0);

    let mut query = state
        .store
        .query(kind::FILE)
        .eq("user_id", json!(user_id))
        .order_by("created_at", SortDirection::Desc)
        .limit(limit)
        .offset(page.max(0) * limit.max(0));

    if let Some(tags) = split_tags(params.tags.as_deref()) {
        query = query.tags_any("tags", tags);
    }

    let files = fetch_summaries(query).await?;
    let total = files.len();

    Ok(Json(json!({
        "files": files,
        "total": total,
        "page": page,
        "limit": limit,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SearchFilesQuery {
    pub user_id: Option<String>,
    pub search_term: Option<String>,
    pub tags: Option<String>,
    pub content_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub is_public: Option<bool>,
    pub limit: Option<i64>,
}

/// GET /api/files/search
///
/// Every filter except `search_term` is pushed into the backend query; the
/// term itself is a case-insensitive substring match applied in-process over
/// filename and the optional metadata description.
pub async fn search_files(
    State(state): State<AppState>,
    Query(params): Query<SearchFilesQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut query = state
        .store
        .query(kind::FILE)
        .order_by("created_at", SortDirection::Desc)
        .limit(params.limit.unwrap_or(DEFAULT_LIST_LIMIT));

    if let Some(user_id) = params.user_id.filter(|v| !v.is_empty()) {
        query = query.eq("user_id", json!(user_id));
    }
    if let Some(is_public) = params.is_public {
        query = query.eq("is_public", json!(is_public));
    }
    if let Some(content_type) = params.content_type.filter(|v| !v.is_empty()) {
        query = query.eq("content_type", json!(content_type));
    }
    if let Some(tags) = split_tags(params.tags.as_deref()) {
        query = query.tags_any("tags", tags);
    }

    let from = params
        .date_from
        .as_deref()
        .map(|v| super::parse_date_param("date_from", v))
        .transpose()?
        .map(models::format_timestamp);
    let to = params
        .date_to
        .as_deref()
        .map(|v| super::parse_date_param("date_to", v))
        .transpose()?
        .map(models::format_timestamp);
    if from.is_some() || to.is_some() {
        query = query.date_range("created_at", from, to);
    }

    let mut files = fetch_summaries(query).await?;
    if let Some(term) = params.search_term.as_deref().filter(|t| !t.is_empty()) {
        files.retain(|file| matches_search_term(file, term));
    }
    let total = files.len();

    Ok(Json(json!({
        "files": files,
        "total": total,
        "search_term": params.search_term,
    })))
}

fn matches_search_term(file: &FileSummary, term: &str) -> bool {
    let term = term.to_lowercase();
    if file.filename.to_lowercase().contains(&term) {
        return true;
    }
    file.metadata
        .get("description")
        .and_then(Value::as_str)
        .map(|d| d.to_lowercase().contains(&term))
        .unwrap_or(false)
}

/// GET /api/files/:id
pub async fn file_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = load_file(&state, &id).await?;
    Ok(Json(serde_json::to_value(FileSummary::from_record(id, record))?))
}

/// GET /api/files/:id/download
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = load_file(&state, &id).await?;
    super::attachment(&record.filename, &record.content_type, record.content)
}

#[derive(Debug, Deserialize)]
pub struct UpdateFileRequest {
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub metadata: Option<Value>,
}

/// PATCH /api/files/:id. Metadata only; content is immutable once saved.
pub async fn update_file_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateFileRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut record = load_file(&state, &id).await?;

    if let Some(tags) = body.tags {
        record.tags = tags;
    }
    if let Some(is_public) = body.is_public {
        record.is_public = is_public;
    }
    if let Some(metadata) = body.metadata {
        record.metadata = metadata;
    }
    record.updated_at = models::now_timestamp();

    state.store.upsert(&id, &serde_json::to_value(&record)?).await?;

    Ok(Json(json!({
        "id": id,
        "message": "File metadata updated successfully",
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileQuery {
    pub user_id: Option<String>,
}

/// DELETE /api/files/:id
///
/// Reads first to verify ownership; the read-then-delete window is not
/// guarded against a concurrent writer.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteFileQuery>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = params
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing user_id parameter"))?;

    let record = load_file(&state, &id).await?;
    if record.user_id != user_id {
        return Err(ApiError::forbidden("Unauthorized to delete this file"));
    }

    state
        .store
        .remove(&id)
        .await
        .map_err(|e| super::map_not_found(e, "File not found"))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "id": id, "message": "File deleted successfully" })),
    ))
}

async fn load_file(state: &AppState, id: &str) -> Result<FileRecord, ApiError> {
    let doc = state
        .store
        .get(id)
        .await
        .map_err(|e| super::map_not_found(e, "File not found"))?;
    let record: FileRecord = serde_json::from_value(doc)?;
    if record.kind != kind::FILE {
        return Err(ApiError::not_found("File not found"));
    }
    Ok(record)
}

async fn fetch_summaries(query: crate::store::DocQuery) -> Result<Vec<FileSummary>, ApiError> {
    let rows = query.fetch().await?;
    rows.into_iter()
        .map(|row| {
            let record: FileRecord = serde_json::from_value(row.doc)?;
            Ok(FileSummary::from_record(row.id, record))
        })
        .collect()
}

fn split_tags(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?;
    let tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str, description: Option<&str>) -> FileRecord {
        FileRecord {
            kind: kind::FILE.to_string(),
            filename: filename.to_string(),
            content: "body".to_string(),
            content_type: "text/plain".to_string(),
            size: 4,
            user_id: "user::a@b.se".to_string(),
            tags: vec![],
            is_public: false,
            metadata: match description {
                Some(d) => json!({ "description": d }),
                None => json!({}),
            },
            created_at: models::now_timestamp(),
            updated_at: models::now_timestamp(),
        }
    }

    #[test]
    fn summary_never_contains_content() {
        let summary = FileSummary::from_record("f-1".to_string(), record("notes.txt", None));
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("content").is_none());
        assert_eq!(value["download_url"], "/api/files/f-1/download");
        assert_eq!(value["filename"], "notes.txt");
    }

    #[test]
    fn search_term_matches_filename_case_insensitively() {
        let summary = FileSummary::from_record("f-1".to_string(), record("Quarterly-Report.txt", None));
        assert!(matches_search_term(&summary, "quarterly"));
        assert!(!matches_search_term(&summary, "annual"));
    }

    #[test]
    fn search_term_falls_back_to_metadata_description() {
        let summary =
            FileSummary::from_record("f-1".to_string(), record("x.txt", Some("GDPR Audit notes")));
        assert!(matches_search_term(&summary, "gdpr audit"));
    }

    #[test]
    fn tags_split_on_commas_and_drop_blanks() {
        assert_eq!(
            split_tags(Some("a, b,,c ")).unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_tags(Some(" , ")).is_none());
        assert!(split_tags(None).is_none());
    }
}
