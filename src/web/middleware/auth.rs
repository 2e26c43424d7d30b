use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use std::sync::Arc;
use tracing::warn;

use crate::web::models::{AuthenticatedUser, Claims};
use crate::web::{AppState, error::AppError};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "token";

/// Decodes the session cookie into the identity it binds, if any.
pub fn session_user(jar: &CookieJar, jwt_secret: &str) -> Option<AuthenticatedUser> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "session token rejected");
    })
    .ok()?;

    Some(AuthenticatedUser {
        id: token_data.claims.user_id,
        name: token_data.claims.sub,
    })
}

/// Requires an authenticated session; anything else redirects to the login
/// page via `AppError::Unauthorized`.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_user(&jar, &state.config.jwt_secret).ok_or(AppError::Unauthorized)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
