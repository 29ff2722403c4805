//! Privacy-aware product search: search activity is only attributed to a
//! user with explicit tracking consent; anonymous searches leave a
//! user-free analytics entry.

use axum::extract::{Json, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::{kind, Product};
use crate::state::AppState;

use super::consent::write_audit;

const DEFAULT_SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsRequest {
    pub query: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub tracking_consent: bool,
    pub limit: Option<i64>,
}

/// POST /api/products/search
pub async fn search_products(
    State(state): State<AppState>,
    Json(body): Json<SearchProductsRequest>,
) -> Result<Json<Value>, ApiError> {
    let term = body
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing search query"))?
        .to_string();

    let mut query = state
        .store
        .query(kind::PRODUCT)
        .limit(body.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));

    if let Some(category) = body.category.as_deref().filter(|c| !c.is_empty()) {
        query = query.eq("category", json!(category));
    }
    if let Some(range) = &body.price_range {
        if range.min.is_some() || range.max.is_some() {
            query = query.number_range("price", range.min, range.max);
        }
    }

    let rows = query.fetch().await?;
    let mut products = Vec::with_capacity(rows.len());
    for row in rows {
        let product: Product = serde_json::from_value(row.doc)?;
        if matches_term(&product, &term) {
            products.push(product);
        }
    }

    let anonymous = body.user_id.is_none();
    if let Some(user_id) = body.user_id.filter(|_| body.tracking_consent) {
        write_audit(
            &state.store,
            Some(user_id),
            "product_search",
            json!({
                "query": term.clone(),
                "category": body.category,
                "resultsCount": products.len(),
                "trackingConsent": true,
            }),
        )
        .await?;
    } else if anonymous {
        // No user attribution and no search term in the analytics entry.
        write_audit(
            &state.store,
            None,
            "anonymous_product_search",
            json!({
                "category": body.category,
                "resultsCount": products.len(),
                "privacyPreserving": true,
            }),
        )
        .await?;
    }

    let total = products.len();
    Ok(Json(json!({
        "products": products,
        "total": total,
        "query": term,
        "privacyMode": !body.tracking_consent,
        "anonymous": anonymous,
    })))
}

fn matches_term(product: &Product, term: &str) -> bool {
    let term = term.to_lowercase();
    if product.name.to_lowercase().contains(&term) {
        return true;
    }
    if let Some(description) = &product.description {
        if description.to_lowercase().contains(&term) {
            return true;
        }
    }
    product.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, description: Option<&str>, tags: &[&str]) -> Product {
        Product {
            kind: kind::PRODUCT.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            category: Some("clothing".to_string()),
            price: Some(29.99),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            extra: Default::default(),
        }
    }

    #[test]
    fn term_matches_name_description_or_tags() {
        let p = product("Organic Cotton T-Shirt", Some("Soft and sustainable"), &["summer"]);
        assert!(matches_term(&p, "organic cotton"));
        assert!(matches_term(&p, "SUSTAINABLE"));
        assert!(matches_term(&p, "summer"));
        assert!(!matches_term(&p, "jeans"));
    }

    #[test]
    fn term_does_not_match_unrelated_fields() {
        let p = product("Jeans", None, &[]);
        assert!(!matches_term(&p, "clothing"));
    }
}
