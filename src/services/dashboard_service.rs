use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::db::services::reading_service::ReadingRow;
use crate::db::services::{device_service, reading_service};
use crate::services::demo_data;
use crate::web::error::AppError;

/// How many rows the dashboard fetches at most, newest first.
const RECENT_READING_LIMIT: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    pub voltage: f64,
    pub current: f64,
    pub active_power: f64,
    pub power_factor: f64,
    pub frequency: f64,
}

/// Parallel, index-aligned series in chronological order, ready to be
/// emitted as literal arrays for the client-side charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub active_power: Vec<f64>,
    pub power_factor: Vec<f64>,
    pub frequency: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub latest: Option<ReadingRow>,
    pub averages: Averages,
    pub chart: ChartSeries,
    pub readings: Vec<ReadingRow>,
}

/// Arithmetic mean of every measured field. All zeros for an empty set.
pub fn averages(rows: &[ReadingRow]) -> Averages {
    if rows.is_empty() {
        return Averages {
            voltage: 0.0,
            current: 0.0,
            active_power: 0.0,
            power_factor: 0.0,
            frequency: 0.0,
        };
    }
    let count = rows.len() as f64;
    Averages {
        voltage: rows.iter().map(|r| r.voltage).sum::<f64>() / count,
        current: rows.iter().map(|r| r.current).sum::<f64>() / count,
        active_power: rows.iter().map(|r| r.active_power).sum::<f64>() / count,
        power_factor: rows.iter().map(|r| r.power_factor).sum::<f64>() / count,
        frequency: rows.iter().map(|r| r.frequency).sum::<f64>() / count,
    }
}

/// Reshapes newest-first rows into oldest-first parallel series, one chart
/// point per source reading.
pub fn chart_series(rows: &[ReadingRow]) -> ChartSeries {
    let mut series = ChartSeries {
        labels: Vec::with_capacity(rows.len()),
        voltage: Vec::with_capacity(rows.len()),
        current: Vec::with_capacity(rows.len()),
        active_power: Vec::with_capacity(rows.len()),
        power_factor: Vec::with_capacity(rows.len()),
        frequency: Vec::with_capacity(rows.len()),
    };
    for row in rows.iter().rev() {
        series.labels.push(row.timestamp.format("%H:%M").to_string());
        series.voltage.push(row.voltage);
        series.current.push(row.current);
        series.active_power.push(row.active_power);
        series.power_factor.push(row.power_factor);
        series.frequency.push(row.frequency);
    }
    series
}

/// Loads everything the dashboard page needs for one user.
///
/// A first visit with no readings and no device seeds the demo device plus a
/// day of hourly samples, then reads them back in the same shape as a normal
/// fetch. Users who already own a device but have no readings are left
/// untouched.
pub async fn load_dashboard<R: Rng + ?Sized>(
    db: &DatabaseConnection,
    user_id: i32,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<DashboardData, AppError> {
    let mut readings = reading_service::recent_readings(db, user_id, RECENT_READING_LIMIT).await?;

    if readings.is_empty() && device_service::device_for_user(db, user_id).await?.is_none() {
        demo_data::seed_demo_data(db, user_id, now, rng).await?;
        readings =
            reading_service::recent_readings(db, user_id, demo_data::DEMO_READING_COUNT as u64)
                .await?;
    }

    Ok(DashboardData {
        latest: readings.first().cloned(),
        averages: averages(&readings),
        chart: chart_series(&readings),
        readings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    use crate::db::entities::device;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn reading(voltage: f64, hour: u32) -> ReadingRow {
        ReadingRow {
            voltage,
            current: 10.0,
            active_power: voltage * 10.0 * 0.9,
            power_factor: 0.9,
            frequency: 50.0,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap(),
            device_name: "Main Power Monitor".to_owned(),
            location: "Main Panel".to_owned(),
        }
    }

    fn mock_row(voltage: f64, hour: u32) -> BTreeMap<&'static str, Value> {
        let source = reading(voltage, hour);
        BTreeMap::from([
            ("voltage", Value::from(source.voltage)),
            ("current", Value::from(source.current)),
            ("active_power", Value::from(source.active_power)),
            ("power_factor", Value::from(source.power_factor)),
            ("frequency", Value::from(source.frequency)),
            ("timestamp", source.timestamp.into()),
            ("device_name", Value::from(source.device_name)),
            ("location", Value::from(source.location)),
        ])
    }

    #[test]
    fn averages_of_empty_set_are_zero() {
        let result = averages(&[]);
        assert_eq!(
            result,
            Averages {
                voltage: 0.0,
                current: 0.0,
                active_power: 0.0,
                power_factor: 0.0,
                frequency: 0.0,
            }
        );
    }

    #[test]
    fn averages_are_arithmetic_means_over_the_fetched_rows() {
        let rows = vec![reading(100.0, 11), reading(200.0, 10)];
        let result = averages(&rows);

        assert_eq!(result.voltage, 150.0);
        assert_eq!(result.current, 10.0);
        assert_eq!(result.active_power, (100.0 * 9.0 + 200.0 * 9.0) / 2.0);
        assert_eq!(result.power_factor, 0.9);
        assert_eq!(result.frequency, 50.0);
    }

    #[test]
    fn chart_series_is_chronological_and_index_aligned() {
        // Newest first, as fetched.
        let rows = vec![reading(240.0, 12), reading(230.0, 11), reading(220.0, 10)];
        let series = chart_series(&rows);

        assert_eq!(series.labels, vec!["10:00", "11:00", "12:00"]);
        assert_eq!(series.voltage, vec![220.0, 230.0, 240.0]);
        assert_eq!(series.labels.len(), series.voltage.len());
        assert_eq!(series.labels.len(), series.current.len());
        assert_eq!(series.labels.len(), series.active_power.len());
        assert_eq!(series.labels.len(), series.power_factor.len());
        assert_eq!(series.labels.len(), series.frequency.len());

        // Index k across all series corresponds to the same source reading.
        for (k, row) in rows.iter().rev().enumerate() {
            assert_eq!(series.voltage[k], row.voltage);
            assert_eq!(series.current[k], row.current);
            assert_eq!(series.active_power[k], row.active_power);
            assert_eq!(series.power_factor[k], row.power_factor);
            assert_eq!(series.frequency[k], row.frequency);
        }
    }

    #[test]
    fn chart_series_serializes_to_literal_arrays() {
        let rows = vec![reading(240.0, 12), reading(220.0, 10)];
        let series = chart_series(&rows);

        // The template passes these straight to the charting library.
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["labels"], serde_json::json!(["10:00", "12:00"]));
        assert_eq!(json["voltage"], serde_json::json!([220.0, 240.0]));
    }

    #[tokio::test]
    async fn dashboard_uses_existing_readings_without_seeding() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![mock_row(200.0, 11), mock_row(100.0, 10)]])
            .into_connection();

        let data = load_dashboard(&db, 1, fixed_now(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();

        assert_eq!(data.readings.len(), 2);
        assert_eq!(data.latest.as_ref().unwrap().voltage, 200.0);
        assert_eq!(data.averages.voltage, 150.0);
        assert_eq!(data.chart.labels, vec!["10:00", "11:00"]);
        assert_eq!(data.chart.voltage, vec![100.0, 200.0]);
    }

    #[tokio::test]
    async fn dashboard_does_not_seed_when_the_user_already_owns_a_device() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([vec![device::Model {
                id: 1,
                device_id: "DEVICE_1_001".to_owned(),
                name: "Main Power Monitor".to_owned(),
                location: "Main Panel".to_owned(),
                user_id: 1,
            }]])
            .into_connection();

        let data = load_dashboard(&db, 1, fixed_now(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();

        assert!(data.readings.is_empty());
        assert!(data.latest.is_none());
        assert_eq!(data.averages.voltage, 0.0);
        assert!(data.chart.labels.is_empty());
    }
}
