use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External identifier, e.g. `DEVICE_42_001`. Unique across all users.
    #[sea_orm(unique)]
    pub device_id: String,
    pub name: String,
    pub location: String,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::power_reading::Entity")]
    PowerReadings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::power_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PowerReadings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
