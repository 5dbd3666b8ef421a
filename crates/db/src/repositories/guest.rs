use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use staybook_core::domain::guest::{Guest, GuestId, GuestUpsertOutcome, NewGuest};
use staybook_core::domain::stay::STAY_DATETIME_FORMAT;
use staybook_core::errors::OperationError;

use super::GuestRepository;
use crate::DbPool;

pub struct SqlGuestRepository {
    pool: DbPool,
}

impl SqlGuestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GuestRepository for SqlGuestRepository {
    async fn upsert(&self, guest: NewGuest) -> Result<GuestUpsertOutcome, OperationError> {
        guest.validate()?;

        let mut conn = self.pool.acquire().await.map_err(OperationError::storage)?;

        // BEGIN IMMEDIATE takes the write lock up front, so the existence
        // probe and the upsert observe the same state under concurrent
        // writers on the same phone.
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(OperationError::storage)?;

        match upsert_in_tx(&mut conn, &guest).await {
            Ok(outcome) => {
                if let Err(error) = sqlx::query("COMMIT").execute(&mut *conn).await {
                    let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                    return Err(OperationError::storage(error));
                }
                Ok(outcome)
            }
            Err(error) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(error)
            }
        }
    }
}

async fn upsert_in_tx(
    conn: &mut SqliteConnection,
    guest: &NewGuest,
) -> Result<GuestUpsertOutcome, OperationError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT guest_id FROM guest WHERE phone = ?")
        .bind(&guest.phone)
        .fetch_optional(&mut *conn)
        .await
        .map_err(OperationError::storage)?;

    let row = sqlx::query(
        "INSERT INTO guest (name, phone, city)
         VALUES (?, ?, ?)
         ON CONFLICT(phone) DO UPDATE SET
            name = excluded.name,
            city = excluded.city
         RETURNING guest_id, name, phone, city, created_at",
    )
    .bind(&guest.name)
    .bind(&guest.phone)
    .bind(&guest.city)
    .fetch_one(&mut *conn)
    .await
    .map_err(|error| map_upsert_error(&guest.phone, error))?;

    Ok(GuestUpsertOutcome { new_guest: existing.is_none(), guest: guest_from_row(row)? })
}

fn map_upsert_error(phone: &str, error: sqlx::Error) -> OperationError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            OperationError::DuplicatePhone(phone.to_string())
        }
        _ => OperationError::storage(error),
    }
}

fn guest_from_row(row: SqliteRow) -> Result<Guest, OperationError> {
    Ok(Guest {
        id: GuestId(row.try_get("guest_id").map_err(OperationError::storage)?),
        name: row.try_get("name").map_err(OperationError::storage)?,
        phone: row.try_get("phone").map_err(OperationError::storage)?,
        city: row.try_get("city").map_err(OperationError::storage)?,
        created_at: parse_created_at(row.try_get("created_at").map_err(OperationError::storage)?)?,
    })
}

fn parse_created_at(value: String) -> Result<NaiveDateTime, OperationError> {
    NaiveDateTime::parse_from_str(&value, STAY_DATETIME_FORMAT).map_err(|error| {
        OperationError::storage(format!("invalid timestamp in `created_at`: `{value}` ({error})"))
    })
}

#[cfg(test)]
mod tests {
    use staybook_core::domain::guest::NewGuest;
    use staybook_core::errors::OperationError;

    use super::SqlGuestRepository;
    use crate::repositories::GuestRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect test pool");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    fn asha() -> NewGuest {
        NewGuest {
            name: "Asha Rao".to_string(),
            phone: "+91-9000000001".to_string(),
            city: "Bengaluru".to_string(),
        }
    }

    async fn guest_row_count(pool: &DbPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(1) FROM guest")
            .fetch_one(pool)
            .await
            .expect("count guests")
    }

    #[tokio::test]
    async fn first_upsert_creates_repeat_upsert_refreshes() {
        let pool = setup_pool().await;
        let repo = SqlGuestRepository::new(pool.clone());

        let created = repo.upsert(asha()).await.expect("create guest");
        assert!(created.new_guest);
        assert_eq!(created.guest.name, "Asha Rao");

        let refreshed = repo
            .upsert(NewGuest {
                name: "Asha R".to_string(),
                phone: "+91-9000000001".to_string(),
                city: "Mysuru".to_string(),
            })
            .await
            .expect("refresh guest");

        assert!(!refreshed.new_guest);
        assert_eq!(refreshed.guest.id, created.guest.id);
        assert_eq!(refreshed.guest.name, "Asha R");
        assert_eq!(refreshed.guest.city, "Mysuru");
        assert_eq!(refreshed.guest.created_at, created.guest.created_at);

        assert_eq!(guest_row_count(&pool).await, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn identical_upserts_resolve_to_the_same_record() {
        let pool = setup_pool().await;
        let repo = SqlGuestRepository::new(pool.clone());

        let first = repo.upsert(asha()).await.expect("first upsert");
        let second = repo.upsert(asha()).await.expect("second upsert");

        assert!(first.new_guest);
        assert!(!second.new_guest);
        assert_eq!(second.guest.id, first.guest.id);
        assert_eq!(second.guest.created_at, first.guest.created_at);
        pool.close().await;
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_touching_the_store() {
        let pool = setup_pool().await;
        let repo = SqlGuestRepository::new(pool.clone());

        let mut blank = asha();
        blank.name = "   ".to_string();

        let error = repo.upsert(blank).await.expect_err("blank name should fail");
        assert!(matches!(error, OperationError::Validation(_)));
        assert_eq!(guest_row_count(&pool).await, 0);
        pool.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_upserts_on_one_phone_leave_one_row() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("guests.db").display());
        let pool = connect_with_settings(&url, 2, 30).await.expect("connect file pool");
        migrations::run_pending(&pool).await.expect("run migrations");

        let first = {
            let repo = SqlGuestRepository::new(pool.clone());
            tokio::spawn(async move { repo.upsert(asha()).await })
        };
        let second = {
            let repo = SqlGuestRepository::new(pool.clone());
            tokio::spawn(async move {
                repo.upsert(NewGuest {
                    name: "Asha R".to_string(),
                    phone: "+91-9000000001".to_string(),
                    city: "Mysuru".to_string(),
                })
                .await
            })
        };

        let first = first.await.expect("join first").expect("first upsert");
        let second = second.await.expect("join second").expect("second upsert");

        assert_eq!(first.guest.id, second.guest.id);
        assert_eq!(
            [first.new_guest, second.new_guest].iter().filter(|new| **new).count(),
            1,
            "exactly one writer should win the new-guest determination",
        );
        assert_eq!(guest_row_count(&pool).await, 1);
        pool.close().await;
    }
}
