use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Pull the access token out of the `Authorization: Bearer ...` header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::InvalidToken.into())
}

/// Resolve the calling user for a protected route.
pub async fn current_user_id(req: &HttpRequest, state: &AppState) -> Result<i32, AppError> {
    let token = bearer_token(req)?;
    state.auth.authenticate(token).await
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for user: {}", req.username);
    let session = state.auth.login(&req.username, &req.password).await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn refresh(
    req: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session = state.auth.refresh(&req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn logout(
    req: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.auth.logout(&req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully logged out"
    })))
}
