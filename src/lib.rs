pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod orders;
pub mod restaurants;
pub mod users;

use std::sync::Arc;

use actix_web::HttpResponse;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{AuthService, SessionTokens, TokenCodec};
pub use db::DbOperations;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Settings) -> Result<Self> {
        // The pool is built lazily; connectivity problems surface on the
        // first query rather than here
        let db = DbOperations::new_lazy(&config.database.url, config.database.max_connections)?;

        let codec = TokenCodec::from_config(&config.auth)?;
        let auth = Arc::new(AuthService::new(
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            codec,
        ));

        Ok(Self {
            config: Arc::new(config),
            db,
            auth,
        })
    }
}
