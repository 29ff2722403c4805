use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Row};

use super::document::{DocumentRow, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Bound parameter for a generated query.
#[derive(Debug, Clone)]
enum Param {
    Text(String),
    Json(Value),
    Number(f64),
    TextArray(Vec<String>),
}

/// Filtered, ordered, paginated query over documents of one kind.
///
/// Supports the filter shapes the handlers need: field equality, an
/// inclusive range over a timestamp field, an inclusive numeric range,
/// and tag set-membership. Field names come from code, never from request
/// input; values are always bound as parameters.
pub struct DocQuery {
    pool: PgPool,
    collection: String,
    kind: String,
    equals: Vec<(String, Value)>,
    date_field: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    number_field: Option<String>,
    number_min: Option<f64>,
    number_max: Option<f64>,
    tags_field: Option<String>,
    tags_any: Vec<String>,
    order_field: Option<String>,
    order_direction: SortDirection,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl DocQuery {
    pub(super) fn new(pool: PgPool, collection: String, kind: &str) -> Self {
        Self {
            pool,
            collection,
            kind: kind.to_string(),
            equals: Vec::new(),
            date_field: None,
            date_from: None,
            date_to: None,
            number_field: None,
            number_min: None,
            number_max: None,
            tags_field: None,
            tags_any: Vec::new(),
            order_field: None,
            order_direction: SortDirection::Desc,
            limit: None,
            offset: None,
        }
    }

    /// Equality filter on a document field.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.equals.push((field.to_string(), value.into()));
        self
    }

    /// Inclusive range over a timestamp field holding fixed-width RFC 3339
    /// strings, so string comparison is chronological.
    pub fn date_range(
        mut self,
        field: &str,
        from: Option<String>,
        to: Option<String>,
    ) -> Self {
        self.date_field = Some(field.to_string());
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Inclusive numeric range over a document field.
    pub fn number_range(mut self, field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.number_field = Some(field.to_string());
        self.number_min = min;
        self.number_max = max;
        self
    }

    /// Set-membership filter: the document's array field shares at least one
    /// element with `tags`.
    pub fn tags_any(mut self, field: &str, tags: Vec<String>) -> Self {
        self.tags_field = Some(field.to_string());
        self.tags_any = tags;
        self
    }

    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_field = Some(field.to_string());
        self.order_direction = direction;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset.max(0));
        self
    }

    /// Execute and return matching rows.
    pub async fn fetch(self) -> Result<Vec<DocumentRow>, StoreError> {
        let (sql, params) = self.to_sql(false);
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_param(query, param);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|r| {
                Ok(DocumentRow {
                    id: r.try_get("id")?,
                    doc: r.try_get("doc")?,
                })
            })
            .collect()
    }

    /// Execute as a count, ignoring order and pagination.
    pub async fn count(self) -> Result<i64, StoreError> {
        let (sql, params) = self.to_sql(true);
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_param(query, param);
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.try_get("count")?)
    }

    /// Generate SQL and the bound parameters in placeholder order.
    fn to_sql(&self, counting: bool) -> (String, Vec<Param>) {
        let mut params: Vec<Param> = vec![Param::Text(self.kind.clone())];
        let mut sql = if counting {
            format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE doc->>'type' = $1",
                self.collection
            )
        } else {
            format!(
                "SELECT id, doc FROM \"{}\" WHERE doc->>'type' = $1",
                self.collection
            )
        };

        for (field, value) in &self.equals {
            params.push(Param::Json(value.clone()));
            sql.push_str(&format!(" AND doc->'{}' = ${}", field, params.len()));
        }

        if let Some(field) = &self.date_field {
            if let Some(from) = &self.date_from {
                params.push(Param::Text(from.clone()));
                sql.push_str(&format!(" AND doc->>'{}' >= ${}", field, params.len()));
            }
            if let Some(to) = &self.date_to {
                params.push(Param::Text(to.clone()));
                sql.push_str(&format!(" AND doc->>'{}' <= ${}", field, params.len()));
            }
        }

        if let Some(field) = &self.number_field {
            if let Some(min) = self.number_min {
                params.push(Param::Number(min));
                sql.push_str(&format!(
                    " AND (doc->>'{}')::double precision >= ${}",
                    field,
                    params.len()
                ));
            }
            if let Some(max) = self.number_max {
                params.push(Param::Number(max));
                sql.push_str(&format!(
                    " AND (doc->>'{}')::double precision <= ${}",
                    field,
                    params.len()
                ));
            }
        }

        if let Some(field) = &self.tags_field {
            if !self.tags_any.is_empty() {
                params.push(Param::TextArray(self.tags_any.clone()));
                sql.push_str(&format!(" AND doc->'{}' ?| ${}", field, params.len()));
            }
        }

        if counting {
            return (sql, params);
        }

        if let Some(field) = &self.order_field {
            sql.push_str(&format!(
                " ORDER BY doc->>'{}' {}",
                field,
                self.order_direction.to_sql()
            ));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        (sql, params)
    }
}

fn bind_param(
    query: sqlx::query::Query<'_, sqlx::Postgres, PgArguments>,
    param: Param,
) -> sqlx::query::Query<'_, sqlx::Postgres, PgArguments> {
    match param {
        Param::Text(s) => query.bind(s),
        Param::Json(v) => query.bind(v),
        Param::Number(n) => query.bind(n),
        Param::TextArray(a) => query.bind(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(kind: &str) -> DocQuery {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").expect("lazy pool");
        DocQuery::new(pool, "documents".to_string(), kind)
    }

    #[tokio::test]
    async fn kind_filter_is_always_first() {
        let (sql, params) = query("file").to_sql(false);
        assert!(sql.starts_with("SELECT id, doc FROM \"documents\" WHERE doc->>'type' = $1"));
        assert_eq!(params.len(), 1);
    }

    #[tokio::test]
    async fn equality_and_range_filters_number_placeholders_in_order() {
        let (sql, params) = query("file")
            .eq("user_id", json!("u-1"))
            .date_range(
                "created_at",
                Some("2024-01-01T00:00:00.000Z".to_string()),
                Some("2024-01-31T00:00:00.000Z".to_string()),
            )
            .to_sql(false);
        assert!(sql.contains("doc->'user_id' = $2"));
        assert!(sql.contains("doc->>'created_at' >= $3"));
        assert!(sql.contains("doc->>'created_at' <= $4"));
        assert_eq!(params.len(), 4);
    }

    #[tokio::test]
    async fn tags_use_array_overlap() {
        let (sql, _) = query("file")
            .tags_any("tags", vec!["report".to_string(), "draft".to_string()])
            .to_sql(false);
        assert!(sql.contains("doc->'tags' ?| $2"));
    }

    #[tokio::test]
    async fn empty_tags_add_no_clause() {
        let (sql, params) = query("file").tags_any("tags", vec![]).to_sql(false);
        assert!(!sql.contains("?|"));
        assert_eq!(params.len(), 1);
    }

    #[tokio::test]
    async fn order_and_pagination_are_appended() {
        let (sql, _) = query("file")
            .order_by("created_at", SortDirection::Desc)
            .limit(20)
            .offset(40)
            .to_sql(false);
        assert!(sql.ends_with("ORDER BY doc->>'created_at' DESC LIMIT 20 OFFSET 40"));
    }

    #[tokio::test]
    async fn negative_pagination_clamps_to_zero() {
        let (sql, _) = query("file").limit(-5).offset(-1).to_sql(false);
        assert!(sql.ends_with("LIMIT 0 OFFSET 0"));
    }

    #[tokio::test]
    async fn count_ignores_order_and_pagination() {
        let (sql, _) = query("order")
            .order_by("created_at", SortDirection::Desc)
            .limit(10)
            .to_sql(true);
        assert!(sql.starts_with("SELECT COUNT(*) AS count"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
    }

    #[tokio::test]
    async fn numeric_range_casts_field() {
        let (sql, params) = query("product")
            .number_range("price", Some(20.0), Some(100.0))
            .to_sql(false);
        assert!(sql.contains("(doc->>'price')::double precision >= $2"));
        assert!(sql.contains("(doc->>'price')::double precision <= $3"));
        assert_eq!(params.len(), 3);
    }
}
