//! Ingestion cycle
//!
//! One cycle takes a sensor snapshot, classifies it, categorizes the label,
//! persists the outcome (activity record for normal labels, anomaly record
//! for abnormal ones) and returns the stream event for the connected
//! client.
//!
//! A failed insert is logged and swallowed: the design trades one cycle's
//! record for stream continuity, so the event is produced either way and
//! the loop keeps running. The WebSocket handler in `api::monitoring` owns
//! the loop itself (interval, send, disconnect).

use carewatch_common::events::MonitorEvent;
use carewatch_common::models::{categorize_activity, Category};
use chrono::NaiveDateTime;
use sqlx::SqliteConnection;
use tracing::{debug, error};

use crate::classifier::ActivityClassifier;
use crate::db;
use crate::sensors::SensorSource;

/// Run one ingestion cycle for a subject on the loop's exclusive
/// connection.
pub async fn run_cycle(
    conn: &mut SqliteConnection,
    sensors: &dyn SensorSource,
    classifier: &dyn ActivityClassifier,
    subject_id: i64,
    now: NaiveDateTime,
) -> MonitorEvent {
    let snapshot = sensors.sample();
    let label = classifier.predict(&snapshot);
    let category = categorize_activity(label);
    debug!("Cycle for subject {}: {} ({})", subject_id, label, category.as_str());

    match category {
        Category::Normal => {
            if let Err(e) = db::activities::insert_predicted(&mut *conn, subject_id, label, now).await
            {
                error!("Failed to persist predicted activity '{}': {}", label, e);
            }
        }
        Category::Abnormal => {
            if let Err(e) = db::anomalies::insert_detected(&mut *conn, subject_id, label, now).await
            {
                error!("Failed to persist anomaly '{}': {}", label, e);
            }
        }
    }

    MonitorEvent::predicted(label, category, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorSnapshot;
    use carewatch_common::events::StreamPriority;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    struct FixedSensors;

    impl SensorSource for FixedSensors {
        fn sample(&self) -> SensorSnapshot {
            SensorSnapshot {
                hour_of_day: 12,
                weekday: 0,
                pir_kitchen: 0,
                pir_living_room: 0,
                pir_bedroom: 0,
                pir_bathroom: 0,
                pir_hallway: 0,
                bed_pressure: false,
                bed_minutes: 0,
                chair_minutes: 0,
                fridge_opened: false,
                oven_opened: false,
                front_door_open: false,
                shower_minutes: 0,
                toilet_minutes: 0,
                sink_minutes: 0,
                fall_detected: false,
            }
        }
    }

    struct FixedClassifier(&'static str);

    impl ActivityClassifier for FixedClassifier {
        fn predict(&self, _snapshot: &SensorSnapshot) -> &'static str {
            self.0
        }
    }

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        carewatch_common::db::init_schema(&pool).await.unwrap();
        pool
    }

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    async fn count(pool: &Pool<Sqlite>, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_normal_cycle_persists_one_predicted_activity() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let event = run_cycle(
            &mut conn,
            &FixedSensors,
            &FixedClassifier("Prise_repas"),
            7,
            now(),
        )
        .await;
        drop(conn);

        assert_eq!(event.category, Category::Normal);
        assert_eq!(event.priority, StreamPriority::Low);
        assert_eq!(count(&pool, "activities").await, 1);
        assert_eq!(count(&pool, "anomalies").await, 0);

        let source: String = sqlx::query_scalar("SELECT source FROM activities")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(source, "PREDICTED");
    }

    #[tokio::test]
    async fn test_abnormal_cycle_persists_one_anomaly() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let event = run_cycle(&mut conn, &FixedSensors, &FixedClassifier("Chute"), 7, now()).await;
        drop(conn);

        assert_eq!(event.category, Category::Abnormal);
        assert_eq!(event.priority, StreamPriority::High);
        assert_eq!(count(&pool, "activities").await, 0);
        assert_eq!(count(&pool, "anomalies").await, 1);

        let (priority, status): (String, String) =
            sqlx::query_as("SELECT priority, status FROM anomalies")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(priority, "High");
        assert_eq!(status, "active");
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_kill_the_loop() {
        let pool = setup_test_db().await;
        // Break the activity store so every insert fails
        sqlx::query("DROP TABLE activities")
            .execute(&pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let classifier = FixedClassifier("Prise_repas");

        // Both cycles still complete and still produce an event
        let first = run_cycle(&mut conn, &FixedSensors, &classifier, 7, now()).await;
        let second = run_cycle(&mut conn, &FixedSensors, &classifier, 7, now()).await;

        assert_eq!(first.activity, "Prise_repas");
        assert_eq!(second.activity, "Prise_repas");
    }
}
