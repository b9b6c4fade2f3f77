//! Caregiver-dependent association store

use carewatch_common::models::Association;
use carewatch_common::{Error, Result};
use chrono::NaiveDateTime;
use sqlx::{Pool, Sqlite};

/// Link a caregiver to a dependent. The pair is unique.
pub async fn create(
    db: &Pool<Sqlite>,
    caregiver_id: i64,
    dependent_id: i64,
    now: NaiveDateTime,
) -> Result<Association> {
    let assigned_at = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let result = sqlx::query(
        "INSERT INTO caregiver_dependent_associations \
         (caregiver_id, dependent_id, assigned_at) VALUES (?, ?, ?)",
    )
    .bind(caregiver_id)
    .bind(dependent_id)
    .bind(&assigned_at)
    .execute(db)
    .await;

    match result {
        Ok(_) => Ok(Association {
            caregiver_id,
            dependent_id,
            assigned_at,
        }),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::Conflict(format!(
            "caregiver {caregiver_id} is already assigned to dependent {dependent_id}"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// The caregiver's primary association: the earliest-assigned dependent.
///
/// A caregiver may be linked to several dependents; endpoints that act "for
/// the caregiver's dependent" resolve through this single explicit rule
/// rather than taking an arbitrary first match.
pub async fn primary_dependent_for(
    db: &Pool<Sqlite>,
    caregiver_id: i64,
) -> Result<Option<i64>> {
    let dependent = sqlx::query_scalar::<_, i64>(
        "SELECT dependent_id FROM caregiver_dependent_associations \
         WHERE caregiver_id = ? \
         ORDER BY assigned_at ASC, dependent_id ASC LIMIT 1",
    )
    .bind(caregiver_id)
    .fetch_optional(db)
    .await?;
    Ok(dependent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        carewatch_common::db::init_schema(&pool).await.unwrap();
        pool
    }

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_pair_conflicts() {
        let pool = setup_test_db().await;
        create(&pool, 1, 2, at(1, 9)).await.unwrap();

        let result = create(&pool, 1, 2, at(1, 10)).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_primary_association_is_earliest_assigned() {
        let pool = setup_test_db().await;
        create(&pool, 1, 20, at(2, 9)).await.unwrap();
        create(&pool, 1, 10, at(1, 9)).await.unwrap();

        let primary = primary_dependent_for(&pool, 1).await.unwrap();
        assert_eq!(primary, Some(10));
    }

    #[tokio::test]
    async fn test_no_association_yields_none() {
        let pool = setup_test_db().await;
        assert_eq!(primary_dependent_for(&pool, 42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dependent_may_have_several_caregivers() {
        let pool = setup_test_db().await;
        create(&pool, 1, 10, at(1, 9)).await.unwrap();
        create(&pool, 2, 10, at(1, 9)).await.unwrap();

        assert_eq!(primary_dependent_for(&pool, 1).await.unwrap(), Some(10));
        assert_eq!(primary_dependent_for(&pool, 2).await.unwrap(), Some(10));
    }
}
