use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller context, extracted from the bearer token.
///
/// A missing header, a malformed header, a bad signature and an expired
/// token all reject with the same 401.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("No token provided"))?;
        let claims = auth::verify_token(&state.config.auth, &token)
            .map_err(|_| ApiError::unauthorized("Invalid token"))?;
        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert("authorization", HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(
            bearer_token(&headers(Some("Bearer abc.def.ghi"))).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn rejects_missing_empty_and_non_bearer() {
        assert!(bearer_token(&headers(None)).is_none());
        assert!(bearer_token(&headers(Some("Bearer "))).is_none());
        assert!(bearer_token(&headers(Some("Basic dXNlcjpwdw=="))).is_none());
    }
}
