use sqlx::sqlite::SqliteConnection;

use staybook_core::domain::booking::{BookingConfirmation, BookingId, BookingStatus, NewBooking};
use staybook_core::domain::room::BuildingId;
use staybook_core::domain::stay::StayWindow;
use staybook_core::errors::OperationError;
use staybook_core::reference::derive_reference_code;

use super::BookingRepository;
use crate::DbPool;

pub struct SqlBookingRepository {
    pool: DbPool,
}

impl SqlBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BookingRepository for SqlBookingRepository {
    async fn create(&self, booking: NewBooking) -> Result<BookingConfirmation, OperationError> {
        let window =
            StayWindow::parse(&booking.check_in_datetime, &booking.check_out_datetime)?;

        let mut conn = self.pool.acquire().await.map_err(OperationError::storage)?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(OperationError::storage)?;

        match insert_in_tx(&mut conn, &booking, &window).await {
            Ok(confirmation) => {
                if let Err(error) = sqlx::query("COMMIT").execute(&mut *conn).await {
                    let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                    return Err(OperationError::storage(error));
                }
                Ok(confirmation)
            }
            Err(error) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(error)
            }
        }
    }
}

async fn insert_in_tx(
    conn: &mut SqliteConnection,
    booking: &NewBooking,
    window: &StayWindow,
) -> Result<BookingConfirmation, OperationError> {
    // The booking row denormalizes the building so the reference code and
    // reporting never depend on later room reassignments.
    let building_id: Option<i64> = sqlx::query_scalar(
        "SELECT rt.building_id
         FROM room r
         JOIN room_type rt ON r.room_type_id = rt.room_type_id
         WHERE r.room_id = ?",
    )
    .bind(booking.room_id.0)
    .fetch_optional(&mut *conn)
    .await
    .map_err(OperationError::storage)?;

    let building_id = building_id.ok_or(OperationError::InvalidRoom(booking.room_id.0))?;

    let result = sqlx::query(
        "INSERT INTO booking (
            guest_id, building_id, room_id, num_persons,
            check_in_datetime, check_out_datetime,
            days_charged, extra_beds, extra_bed_price,
            subtotal_amount, taxes_and_fees, total_price,
            advance_due_amount, status_id
         ) VALUES (
            ?, ?, ?, ?,
            ?, ?,
            ?, ?, ?,
            ?, ?, ?,
            ?,
            (SELECT booking_status_id FROM booking_status WHERE code = ?)
         )",
    )
    .bind(booking.guest_id.0)
    .bind(building_id)
    .bind(booking.room_id.0)
    .bind(booking.num_persons)
    .bind(window.check_in_stored())
    .bind(window.check_out_stored())
    .bind(booking.days_charged)
    .bind(booking.extra_beds)
    .bind(booking.extra_bed_price.to_string())
    .bind(booking.subtotal_amount.to_string())
    .bind(booking.taxes_and_fees.to_string())
    .bind(booking.total_price.to_string())
    .bind(booking.advance_due_amount.to_string())
    .bind(BookingStatus::Requested.as_str())
    .execute(&mut *conn)
    .await
    .map_err(OperationError::storage)?;

    let booking_id = BookingId(result.last_insert_rowid());
    let reference_code = derive_reference_code(
        BuildingId(building_id),
        booking.room_id,
        window.check_in,
        booking.days_charged,
    );
    let message = format!(
        "Booking created! Use {reference_code} for reference. Please note that this is \
         not a confirmation code. Your booking is currently in '{}' status and will be \
         confirmed once processed after payment.",
        BookingStatus::Requested.as_str(),
    );

    Ok(BookingConfirmation { booking_id, reference_code, message, details: booking.details() })
}
