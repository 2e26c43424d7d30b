use axum::{Router, middleware as axum_middleware};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tera::Tera;

use crate::server::config::ServerConfig;

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub templates: Tera,
    pub config: Arc<ServerConfig>,
}

pub fn create_router(db: DatabaseConnection, templates: Tera, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState {
        db,
        templates,
        config,
    });

    Router::new()
        .merge(
            routes::dashboard_routes::dashboard_router().route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), middleware::auth::auth),
            ),
        )
        .merge(routes::auth_routes::auth_router())
        .with_state(app_state)
}
