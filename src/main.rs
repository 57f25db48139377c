use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use plateful_server::auth::handlers::{login, logout, refresh};
use plateful_server::orders::handlers::{add_item, remove_item, view_order};
use plateful_server::restaurants::handlers::{
    create_dish, create_restaurant, delete_dish, delete_restaurant, get_dish, get_menu,
    list_restaurants,
};
use plateful_server::users::handlers::{delete_profile, read_profile, register, update_profile};
use plateful_server::{health_check, AppError, AppState, Settings};
use std::net::TcpListener;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

// How often expired refresh-token rows are swept out of the store.
const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[actix_web::main]
async fn main() -> plateful_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!(
        "Starting server at {}:{}",
        config.server.host, config.server.port
    );

    // Initialize application state
    let state = AppState::new(config.clone())?;
    state.db.run_migrations().await?;
    let state = web::Data::new(state);

    // Sweep expired refresh tokens in the background. is_valid already
    // ignores them; this keeps the table from growing without bound.
    let sweep_db = state.db.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(TOKEN_SWEEP_INTERVAL).await;
            match sweep_db.delete_expired_refresh_tokens().await {
                Ok(0) => {}
                Ok(swept) => info!("Swept {} expired refresh tokens", swept),
                Err(e) => warn!("Refresh token sweep failed: {}", e),
            }
        }
    });

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    // Start HTTP server
    let environment = config.environment.clone();
    HttpServer::new(move || {
        let cors = if environment == "development" {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allowed_headers(vec!["Authorization", "Content-Type"])
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .route("/auth/login", web::post().to(login))
            .route("/auth/refresh", web::post().to(refresh))
            .route("/auth/logout", web::post().to(logout))
            .route("/users", web::post().to(register))
            .route("/users/me", web::get().to(read_profile))
            .route("/users/me", web::put().to(update_profile))
            .route("/users/me", web::delete().to(delete_profile))
            .route("/restaurants", web::get().to(list_restaurants))
            .route("/restaurants", web::post().to(create_restaurant))
            .route("/restaurants/{id}", web::delete().to(delete_restaurant))
            .route("/restaurants/{id}/menu", web::get().to(get_menu))
            .route("/restaurants/{id}/dishes", web::post().to(create_dish))
            .route(
                "/restaurants/{id}/dishes/{dish_id}",
                web::get().to(get_dish),
            )
            .route(
                "/restaurants/{id}/dishes/{dish_id}",
                web::delete().to(delete_dish),
            )
            .route("/orders", web::get().to(view_order))
            .route("/orders/items", web::post().to(add_item))
            .route(
                "/orders/items/{restaurant_id}/{dish_id}",
                web::delete().to(remove_item),
            )
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
