use serde::{Deserialize, Serialize};
use std::env;

/// Process configuration, resolved once at startup and injected into the
/// composition root. Every option has a hard-coded fallback so the service
/// boots in a bare environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base connection string; credentials are injected separately.
    pub connection_string: String,
    pub username: String,
    pub password: String,
    /// Name of the document collection (backing table).
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_secret: String,
    pub token_ttl_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("STORE_URL") {
            self.store.connection_string = v;
        }
        if let Ok(v) = env::var("STORE_USERNAME") {
            self.store.username = v;
        }
        if let Ok(v) = env::var("STORE_PASSWORD") {
            self.store.password = v;
        }
        if let Ok(v) = env::var("STORE_COLLECTION") {
            self.store.collection = v;
        }
        if let Ok(v) = env::var("TOKEN_SECRET") {
            self.auth.token_secret = v;
        }
        if let Ok(v) = env::var("TOKEN_TTL_DAYS") {
            self.auth.token_ttl_days = v.parse().unwrap_or(self.auth.token_ttl_days);
        }
        if let Ok(v) = env::var("PORT") {
            self.port = v.parse().unwrap_or(self.port);
        }
        self
    }

    fn defaults() -> Self {
        Self {
            store: StoreConfig {
                connection_string: "postgres://localhost:5432/storefront".to_string(),
                username: "storefront".to_string(),
                password: "password".to_string(),
                collection: "documents".to_string(),
            },
            auth: AuthConfig {
                token_secret: "dev-secret-change-me".to_string(),
                token_ttl_days: 7,
            },
            port: 3000,
        }
    }
}
