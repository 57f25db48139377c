use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// One outstanding refresh credential. Rows are deleted on logout or
/// rotation; expired rows are ignored by validity checks and removed by
/// the periodic sweep.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: i32,
    pub user_id: i32,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Validity requires the stored expiry to be strictly in the future.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dish {
    pub dish_id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// The single current cart-like order a user owns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub user_id: i32,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub user_id: i32,
    pub restaurant_id: i32,
    pub dish_id: i32,
    pub quantity: i32,
}

/// Line item joined with its dish details, as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItemDetail {
    pub restaurant_id: i32,
    pub dish_id: i32,
    pub quantity: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
}
