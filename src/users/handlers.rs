use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::auth::handlers::current_user_id;
use crate::auth::password::hash_password;
use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for user: {}", req.name);

    if state.db.get_user_by_name(&req.name).await?.is_some() {
        return Err(AppError::ValidationError(
            "User with this name already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .create_user(&req.name, &password_hash, &req.phone, &req.address)
        .await?;

    // Every user owns exactly one current order from the start
    state.db.ensure_order(user.id).await?;

    info!(user_id = user.id, "Registration successful");
    Ok(HttpResponse::Created().json(user))
}

pub async fn read_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&req, &state).await?;
    let user = state
        .db
        .get_user_by_id(user_id)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_profile(
    req: HttpRequest,
    payload: web::Json<UpdateProfileRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&req, &state).await?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = state
        .db
        .update_user(
            user_id,
            payload.name.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
            password_hash.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&req, &state).await?;
    state.db.delete_user(user_id).await?;
    info!(user_id, "Account deleted");
    Ok(HttpResponse::NoContent().finish())
}
