use sqlx::migrate::{MigrateError, Migrator};

use crate::repositories::RepositoryError;
use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaStatus {
    Ready,
    MissingBookingTable,
    MissingStatusCodes,
}

/// Readiness probe for operators: is the booking schema usable as-is?
pub async fn schema_status(pool: &DbPool) -> Result<SchemaStatus, RepositoryError> {
    let booking_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name = 'booking'",
    )
    .fetch_one(pool)
    .await?;
    if booking_table != 1 {
        return Ok(SchemaStatus::MissingBookingTable);
    }

    let requested: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM booking_status WHERE code = 'REQUESTED')",
    )
    .fetch_one(pool)
    .await?;

    Ok(if requested == 1 { SchemaStatus::Ready } else { SchemaStatus::MissingStatusCodes })
}
