use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait};
use tracing::info;

use crate::db::entities::{device, power_reading};

/// Number of synthetic readings written on a user's first visit: one per
/// hour over the preceding day.
pub const DEMO_READING_COUNT: usize = 24;

pub const DEMO_DEVICE_NAME: &str = "Main Power Monitor";
pub const DEMO_DEVICE_LOCATION: &str = "Main Panel";

/// One generated sample, before it is attached to a device and persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReading {
    pub voltage: f64,
    pub current: f64,
    pub active_power: f64,
    pub power_factor: f64,
    pub frequency: f64,
    pub timestamp: DateTime<Utc>,
}

pub fn demo_device_id(user_id: i32) -> String {
    format!("DEVICE_{user_id}_001")
}

/// Generates plausible hourly samples for the 24 hours preceding `now`.
///
/// `active_power` is derived from its own uniform factor rather than the
/// stored `power_factor`, so the persisted rows do not satisfy
/// `active_power == voltage * current * power_factor` exactly.
pub fn generate_demo_readings<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<DemoReading> {
    let base = now - Duration::hours(DEMO_READING_COUNT as i64);
    (0..DEMO_READING_COUNT)
        .map(|hour| {
            let voltage = rng.random_range(218..=242) as f64;
            let current = rng.random_range(50..=300) as f64 / 10.0;
            let active_power = voltage * current * (rng.random_range(85..=98) as f64 / 100.0);
            let power_factor = rng.random_range(85..=98) as f64 / 100.0;
            let frequency = rng.random_range(498..=502) as f64 / 10.0;
            DemoReading {
                voltage,
                current,
                active_power,
                power_factor,
                frequency,
                timestamp: base + Duration::hours(hour as i64),
            }
        })
        .collect()
}

/// Creates the demo device and its readings for a user in one transaction.
/// A failure rolls back everything, so a device is never left behind without
/// its readings. The unique index on `devices.device_id` makes two racing
/// first visits resolve to a single seeded set: the losing transaction fails
/// on the device insert and rolls back.
pub async fn seed_demo_data<R: Rng + ?Sized>(
    db: &DatabaseConnection,
    user_id: i32,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<(), DbErr> {
    let device_id = demo_device_id(user_id);
    let readings = generate_demo_readings(rng, now);

    let txn = db.begin().await?;

    let demo_device = device::ActiveModel {
        device_id: Set(device_id.clone()),
        name: Set(DEMO_DEVICE_NAME.to_owned()),
        location: Set(DEMO_DEVICE_LOCATION.to_owned()),
        user_id: Set(user_id),
        ..Default::default()
    };
    demo_device.insert(&txn).await?;

    let rows = readings.into_iter().map(|reading| power_reading::ActiveModel {
        device_id: Set(device_id.clone()),
        user_id: Set(user_id),
        voltage: Set(reading.voltage),
        current: Set(reading.current),
        active_power: Set(reading.active_power),
        power_factor: Set(reading.power_factor),
        frequency: Set(reading.frequency),
        timestamp: Set(reading.timestamp),
        ..Default::default()
    });
    power_reading::Entity::insert_many(rows).exec(&txn).await?;

    txn.commit().await?;
    info!(user_id, device_id = %device_id, "seeded demo readings for first visit");
    Ok(())
}
