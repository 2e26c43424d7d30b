use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::services::auth_service;
use crate::web::{
    AppState,
    error::AppError,
    middleware::auth::{SESSION_COOKIE, session_user},
    models::{LoginForm, RegisterForm},
};

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/register", get(register_page).post(register_submit))
        .route("/logout", get(logout))
}

fn render_login(
    state: &AppState,
    error: Option<String>,
    email: &str,
) -> Result<Html<String>, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("error", &error);
    ctx.insert("email", email);
    Ok(Html(state.templates.render("login.html", &ctx)?))
}

fn render_register(
    state: &AppState,
    error: Option<String>,
    name: &str,
    email: &str,
) -> Result<Html<String>, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("error", &error);
    ctx.insert("name", name);
    ctx.insert("email", email);
    Ok(Html(state.templates.render("register.html", &ctx)?))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

async fn login_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    // Already logged in: straight to the dashboard.
    if session_user(&jar, &state.config.jwt_secret).is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(render_login(&state, None, "")?.into_response())
}

async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match auth_service::login_user(&state.db, &form).await {
        Ok(user) => {
            let token = auth_service::create_session_token(&user, &state.config.jwt_secret)?;
            Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
        }
        Err(err) => match err.form_message() {
            Some(message) => {
                Ok(render_login(&state, Some(message), form.email.trim())?.into_response())
            }
            None => Err(err),
        },
    }
}

async fn register_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render_register(&state, None, "", "")
}

async fn register_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match auth_service::register_user(&state.db, &form).await {
        Ok(user) => {
            let token = auth_service::create_session_token(&user, &state.config.jwt_secret)?;
            Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
        }
        Err(err) => match err.form_message() {
            Some(message) => Ok(render_register(
                &state,
                Some(message),
                form.name.trim(),
                form.email.trim(),
            )?
            .into_response()),
            None => Err(err),
        },
    }
}

async fn logout(jar: CookieJar) -> impl IntoResponse {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Redirect::to("/login"))
}
