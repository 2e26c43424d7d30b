use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::{device, power_reading};

// --- PowerReading Service Functions ---

/// A power reading joined with the name and location of the device that
/// produced it, as shown on the dashboard.
#[derive(FromQueryResult, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRow {
    pub voltage: f64,
    pub current: f64,
    pub active_power: f64,
    pub power_factor: f64,
    pub frequency: f64,
    pub timestamp: DateTime<Utc>,
    pub device_name: String,
    pub location: String,
}

/// Retrieves the most recent readings for a user, newest first, joined with
/// the owning device.
pub async fn recent_readings(
    db: &DatabaseConnection,
    user_id: i32,
    limit: u64,
) -> Result<Vec<ReadingRow>, DbErr> {
    power_reading::Entity::find()
        .select_only()
        .column(power_reading::Column::Voltage)
        .column(power_reading::Column::Current)
        .column(power_reading::Column::ActivePower)
        .column(power_reading::Column::PowerFactor)
        .column(power_reading::Column::Frequency)
        .column(power_reading::Column::Timestamp)
        .column_as(device::Column::Name, "device_name")
        .column(device::Column::Location)
        .join(JoinType::InnerJoin, power_reading::Relation::Device.def())
        .filter(power_reading::Column::UserId.eq(user_id))
        .order_by_desc(power_reading::Column::Timestamp)
        .limit(limit)
        .into_model::<ReadingRow>()
        .all(db)
        .await
}
