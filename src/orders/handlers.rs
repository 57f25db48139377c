use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::handlers::current_user_id;
use crate::db::models::OrderItemDetail;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub restaurant_id: i32,
    pub dish_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub user_id: i32,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemDetail>,
}

pub async fn add_item(
    req: HttpRequest,
    payload: web::Json<AddItemRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&req, &state).await?;

    if payload.quantity < 1 {
        return Err(AppError::ValidationError(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let dish = state
        .db
        .get_dish(payload.restaurant_id, payload.dish_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Dish not found".to_string()))?;

    state.db.ensure_order(user_id).await?;
    let item = state
        .db
        .add_order_item(user_id, payload.restaurant_id, payload.dish_id, payload.quantity)
        .await?;

    Ok(HttpResponse::Ok().json(OrderItemDetail {
        restaurant_id: item.restaurant_id,
        dish_id: item.dish_id,
        quantity: item.quantity,
        name: dish.name,
        description: dish.description,
        price: dish.price,
    }))
}

pub async fn view_order(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&req, &state).await?;

    let order = state
        .db
        .get_order(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    let items = state.db.list_order_items(user_id).await?;

    Ok(HttpResponse::Ok().json(OrderResponse {
        user_id: order.user_id,
        status: order.status,
        payment_method: order.payment_method,
        created_at: order.created_at,
        items,
    }))
}

pub async fn remove_item(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&req, &state).await?;
    let (restaurant_id, dish_id) = path.into_inner();

    if !state
        .db
        .remove_order_item(user_id, restaurant_id, dish_id)
        .await?
    {
        return Err(AppError::NotFound("Item not found in order".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
