pub mod auth_routes;
pub mod dashboard_routes;
