//! Persistence layer: connection pool, row models and all SQL.

pub mod models;
pub mod operations;

pub use models::{Dish, Order, OrderItem, OrderItemDetail, RefreshToken, Restaurant, User};
pub use operations::DbOperations;
