use axum::extract::State;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use storefront_api::config::AppConfig;
use storefront_api::state::AppState;
use storefront_api::store::DocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up STORE_URL, TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    let store = DocumentStore::connect(&config.store).await?;
    let state = AppState::new(store, config);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("storefront API listening on http://{}", bind_addr);

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(file_routes())
        .merge(privacy_routes())
        .merge(product_routes())
        .merge(report_routes())
        .merge(plan_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::post;
    use storefront_api::handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/profile", get(auth::profile))
}

fn file_routes() -> Router<AppState> {
    use axum::routing::post;
    use storefront_api::handlers::files;

    Router::new()
        .route("/api/files", post(files::save_file).get(files::list_files))
        .route("/api/files/bulk", post(files::bulk_save))
        .route("/api/files/search", get(files::search_files))
        .route(
            "/api/files/:id",
            get(files::file_info)
                .patch(files::update_file_metadata)
                .delete(files::delete_file),
        )
        .route("/api/files/:id/download", get(files::download_file))
}

fn privacy_routes() -> Router<AppState> {
    use axum::routing::post;
    use storefront_api::handlers::{audit, consent, orders};

    Router::new()
        .route("/api/orders", get(orders::get_user_orders))
        .route("/api/audit", get(audit::get_audit_trail))
        .route("/api/consents", post(consent::update_consent))
        .route("/api/data-requests", post(consent::handle_data_subject_request))
}

fn product_routes() -> Router<AppState> {
    use axum::routing::post;
    use storefront_api::handlers::products;

    Router::new().route("/api/products/search", post(products::search_products))
}

fn report_routes() -> Router<AppState> {
    use axum::routing::post;
    use storefront_api::handlers::compliance;

    Router::new()
        .route("/api/reports/compliance", post(compliance::generate_report))
        .route(
            "/api/reports/compliance/:id/download",
            get(compliance::download_report),
        )
        .route(
            "/api/compliance-files/:id/download",
            get(compliance::download_compliance_file),
        )
}

fn plan_routes() -> Router<AppState> {
    use axum::routing::post;
    use storefront_api::handlers::plans;

    Router::new()
        .route("/api/plans", post(plans::create_plan).get(plans::list_plans))
        .route(
            "/api/plans/download",
            get(plans::download_plan_query).post(plans::download_plan_body),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Storefront API",
        "version": version,
        "description": "E-commerce storefront backend with GDPR tooling, file storage and project planning",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/auth/register, /auth/login, /auth/profile",
            "files": "/api/files[/bulk|/search|/:id[/download]]",
            "orders": "/api/orders",
            "audit": "/api/audit",
            "consents": "/api/consents",
            "data_requests": "/api/data-requests",
            "products": "/api/products/search",
            "reports": "/api/reports/compliance[/:id/download]",
            "plans": "/api/plans[/download]",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
