use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::db::entities::user;

// --- User Service Functions ---

/// Creates a new user with an already-hashed password.
pub async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<user::Model, DbErr> {
    let new_user = user::ActiveModel {
        name: Set(name.to_owned()),
        email: Set(email.to_owned()),
        password_hash: Set(password_hash.to_owned()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_user.insert(db).await
}

/// Retrieves a user by exact email match.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}
