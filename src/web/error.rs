use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

/// Message shown for unexpected store or rendering failures. Nothing is
/// retried.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Email already exists. Please use a different email.")]
    EmailTaken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("database error: {0}")]
    DatabaseError(String),
    #[error("template error: {0}")]
    TemplateError(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// The inline message a form handler shows on re-render, or `None` when
    /// the error should escape as a response instead.
    pub fn form_message(&self) -> Option<String> {
        match self {
            AppError::InvalidInput(msg) => Some(msg.clone()),
            AppError::InvalidCredentials | AppError::EmailTaken => Some(self.to_string()),
            AppError::DatabaseError(detail) => {
                error!(detail = %detail, "persistence failure surfaced to a form");
                Some(GENERIC_ERROR_MESSAGE.to_string())
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Missing or invalid session: send the browser to the login page.
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, Html(msg)).into_response(),
            AppError::InvalidCredentials | AppError::EmailTaken => {
                (StatusCode::BAD_REQUEST, Html(self.to_string())).into_response()
            }
            AppError::DatabaseError(detail)
            | AppError::TemplateError(detail)
            | AppError::InternalServerError(detail) => {
                error!(detail = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(GENERIC_ERROR_MESSAGE.to_string()),
                )
                    .into_response()
            }
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::TemplateError(err.to_string())
    }
}
