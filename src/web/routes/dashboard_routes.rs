use axum::{
    Router,
    extract::{Extension, State},
    response::Html,
    routing::get,
};
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;

use crate::services::dashboard_service;
use crate::web::{AppState, error::AppError, models::AuthenticatedUser};

pub fn dashboard_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Html<String>, AppError> {
    let mut rng = StdRng::from_os_rng();
    let data = dashboard_service::load_dashboard(&state.db, user.id, Utc::now(), &mut rng).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("user_name", &user.name);
    ctx.insert("latest", &data.latest);
    ctx.insert("averages", &data.averages);
    ctx.insert("chart", &data.chart);
    ctx.insert("readings", &data.readings);
    Ok(Html(state.templates.render("dashboard.html", &ctx)?))
}
