use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::models::{Dish, Restaurant};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDishRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub restaurant: Restaurant,
    pub dishes: Vec<Dish>,
}

pub async fn list_restaurants(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let restaurants = state.db.list_restaurants().await?;
    Ok(HttpResponse::Ok().json(restaurants))
}

pub async fn create_restaurant(
    req: web::Json<CreateRestaurantRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let restaurant = state
        .db
        .create_restaurant(&req.name, &req.description, &req.address, &req.phone)
        .await?;

    Ok(HttpResponse::Created().json(restaurant))
}

pub async fn delete_restaurant(
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    if !state.db.delete_restaurant(restaurant_id).await? {
        return Err(AppError::NotFound("Restaurant not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_menu(
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    let restaurant = state
        .db
        .get_restaurant(restaurant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    let dishes = state.db.list_menu(restaurant_id).await?;

    Ok(HttpResponse::Ok().json(MenuResponse { restaurant, dishes }))
}

pub async fn get_dish(
    path: web::Path<(i32, i32)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (restaurant_id, dish_id) = path.into_inner();
    let dish = state
        .db
        .get_dish(restaurant_id, dish_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Dish not found".to_string()))?;

    Ok(HttpResponse::Ok().json(dish))
}

pub async fn create_dish(
    path: web::Path<i32>,
    req: web::Json<CreateDishRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    if state.db.get_restaurant(restaurant_id).await?.is_none() {
        return Err(AppError::NotFound("Restaurant not found".to_string()));
    }

    let dish = state
        .db
        .create_dish(restaurant_id, &req.name, &req.description, req.price)
        .await?;

    Ok(HttpResponse::Created().json(dish))
}

pub async fn delete_dish(
    path: web::Path<(i32, i32)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (restaurant_id, dish_id) = path.into_inner();
    if !state.db.delete_dish(restaurant_id, dish_id).await? {
        return Err(AppError::NotFound("Dish not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
