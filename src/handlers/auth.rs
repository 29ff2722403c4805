//! Registration, login and bearer-token profile lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::error::{ApiError, FieldError};
use crate::middleware::AuthUser;
use crate::models::{self, kind, User, UserProfile};
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug)]
struct RegisterInput {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

const MIN_PASSWORD_LENGTH: usize = 6;

impl RegisterRequest {
    fn validate(self) -> Result<RegisterInput, ApiError> {
        let mut errors = Vec::new();

        let email = normalize_email(self.email.as_deref().unwrap_or(""));
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        let password = self.password.unwrap_or_default();
        if password.len() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        let first_name = self.first_name.unwrap_or_default().trim().to_string();
        if first_name.is_empty() {
            errors.push(FieldError::missing("firstName"));
        }
        let last_name = self.last_name.unwrap_or_default().trim().to_string();
        if last_name.is_empty() {
            errors.push(FieldError::missing("lastName"));
        }

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(RegisterInput {
            email,
            password,
            first_name,
            last_name,
        })
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = body.validate()?;
    let key = User::document_key(&input.email);

    // Existence probe: NotFound means the address is free.
    match state.store.get(&key).await {
        Ok(_) => return Err(ApiError::conflict("User already exists")),
        Err(StoreError::NotFound(_)) => {}
        Err(other) => return Err(other.into()),
    }

    let now = models::now_timestamp();
    let user = User {
        kind: kind::USER.to_string(),
        email: input.email,
        password: auth::hash_password(&input.password)?,
        first_name: input.first_name,
        last_name: input.last_name,
        role: "customer".to_string(),
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login: None,
        profile: UserProfile::default(),
    };

    state.store.insert(&key, &serde_json::to_value(&user)?).await?;
    let token = auth::issue_token(&state.config.auth, &key)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "token": token,
            "user": user.summary(&key),
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login
///
/// Absent user, inactive user and wrong password are indistinguishable to
/// the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let email = normalize_email(body.email.as_deref().unwrap_or(""));
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
    let password = body.password.unwrap_or_default();
    if password.is_empty() {
        errors.push(FieldError::missing("password"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let key = User::document_key(&email);
    let doc = match state.store.get(&key).await {
        Ok(doc) => doc,
        Err(StoreError::NotFound(_)) => return Err(invalid_credentials()),
        Err(other) => return Err(other.into()),
    };
    let mut user: User = serde_json::from_value(doc)?;

    if !user.is_active || !auth::verify_password(&user.password, &password) {
        return Err(invalid_credentials());
    }

    let now = models::now_timestamp();
    user.last_login = Some(now.clone());
    user.updated_at = now;
    state.store.upsert(&key, &serde_json::to_value(&user)?).await?;

    let token = auth::issue_token(&state.config.auth, &key)?;
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user.summary(&key),
    })))
}

/// GET /auth/profile
pub async fn profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let doc = state
        .store
        .get(&auth_user.user_id)
        .await
        .map_err(|e| super::map_not_found(e, "User not found"))?;
    let user: User = serde_json::from_value(doc)?;

    if !user.is_active {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(json!({
        "user": {
            "id": auth_user.user_id,
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
            "role": user.role,
            "profile": user.profile,
            "createdAt": user.created_at,
        }
    })))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
}
