use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::db::entities::device;

// --- Device Service Functions ---

/// Retrieves any device owned by the given user, if one exists.
pub async fn device_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<device::Model>, DbErr> {
    device::Entity::find()
        .filter(device::Column::UserId.eq(user_id))
        .one(db)
        .await
}
