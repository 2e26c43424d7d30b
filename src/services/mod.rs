pub mod auth_service;
pub mod dashboard_service;
pub mod demo_data;
