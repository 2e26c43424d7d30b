use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::DatabaseConnection;

use crate::db::entities::user;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginForm, RegisterForm};

const MIN_PASSWORD_LEN: usize = 6;

/// Looks the user up by exact email match and verifies the password against
/// the stored hash. Both an unknown email and a wrong password produce the
/// same `InvalidCredentials` error.
pub async fn login_user(
    db: &DatabaseConnection,
    form: &LoginForm,
) -> Result<user::Model, AppError> {
    let email = form.email.trim();
    let password = form.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Both email and password are required.".to_string(),
        ));
    }

    let user = user_service::get_user_by_email(db, email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid_password = verify(password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("password verification failed: {e}")))?;

    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

/// Validates the registration form, rejects duplicate emails, hashes the
/// password and persists the new user.
pub async fn register_user(
    db: &DatabaseConnection,
    form: &RegisterForm,
) -> Result<user::Model, AppError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let password = form.password.trim();
    let confirm_password = form.confirm_password.trim();

    validate_registration(name, email, password, confirm_password)?;

    if user_service::get_user_by_email(db, email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let password_hash = hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("password hashing failed: {e}")))?;

    Ok(user_service::create_user(db, name, email, &password_hash).await?)
}

fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), AppError> {
    if name.is_empty() || email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(AppError::InvalidInput("All fields are required.".to_string()));
    }
    if !is_valid_email(email) {
        return Err(AppError::InvalidInput(
            "Please enter a valid email address.".to_string(),
        ));
    }
    if password != confirm_password {
        return Err(AppError::InvalidInput("Passwords do not match.".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(
            "Password must be at least 6 characters long.".to_string(),
        ));
    }
    Ok(())
}

/// Structural check only: a non-empty local part and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// Mints the signed session token binding the user's id and display name to
/// the browser session. Valid for 24 hours.
pub fn create_session_token(user: &user::Model, jwt_secret: &str) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user.name.clone(),
        user_id: user.id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::InternalServerError(format!("session token creation failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored_user(email: &str, password: &str) -> user::Model {
        user::Model {
            id: 7,
            name: "Jane".to_owned(),
            email: email.to_owned(),
            // Low cost keeps the tests fast.
            password_hash: hash(password, 4).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    fn register_form(name: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm.to_owned(),
        }
    }

    #[test]
    fn validation_rejects_missing_fields_and_weak_passwords() {
        let cases = [
            (("", "jane@x.com", "secret1", "secret1"), "All fields are required."),
            (("Jane", "janex.com", "secret1", "secret1"), "Please enter a valid email address."),
            (("Jane", "jane@x.com", "secret1", "secret2"), "Passwords do not match."),
            (("Jane", "jane@x.com", "abc", "abc"), "Password must be at least 6 characters long."),
        ];
        for ((name, email, password, confirm), expected) in cases {
            let err = validate_registration(name, email, password, confirm).unwrap_err();
            match err {
                AppError::InvalidInput(msg) => assert_eq!(msg, expected),
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }

        assert!(validate_registration("Jane", "jane@x.com", "secret1", "secret1").is_ok());
    }

    #[test]
    fn email_check_requires_local_part_and_dotted_domain() {
        for valid in ["jane@x.com", "a.b@sub.example.org"] {
            assert!(is_valid_email(valid), "{valid} should be accepted");
        }
        for invalid in ["janex.com", "jane@", "jane@x", "@x.com", "jane doe@x.com", "jane@x..com"] {
            assert!(!is_valid_email(invalid), "{invalid} should be rejected");
        }
    }

    #[tokio::test]
    async fn login_with_unknown_email_fails_with_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = login_user(&db, &login_form("nobody@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails_with_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user("jane@x.com", "secret1")]])
            .into_connection();

        let err = login_user(&db, &login_form("jane@x.com", "wrong-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_correct_credentials_returns_the_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user("jane@x.com", "secret1")]])
            .into_connection();

        let user = login_user(&db, &login_form("jane@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Jane");
    }

    #[tokio::test]
    async fn registration_rejects_an_already_used_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user("jane@x.com", "secret1")]])
            .into_connection();

        let err = register_user(&db, &register_form("Jane", "jane@x.com", "secret1", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailTaken));
    }

    #[tokio::test]
    async fn registration_with_a_fresh_email_yields_a_session_worthy_user() {
        let persisted = stored_user("jane@x.com", "secret1");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([vec![persisted.clone()]])
            .into_connection();

        let user = register_user(&db, &register_form("Jane", "jane@x.com", "secret1", "secret1"))
            .await
            .unwrap();
        assert_eq!(user.email, "jane@x.com");

        // The session token binds the id and display name the dashboard uses.
        let token = create_session_token(&user, "test-secret").unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("test-secret".as_ref()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.user_id, 7);
        assert_eq!(decoded.claims.sub, "Jane");
    }
}
