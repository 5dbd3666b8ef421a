use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use staybook_core::domain::room::{Availability, RoomId, RoomOffer, RoomRate};
use staybook_core::domain::stay::StayWindow;
use staybook_core::errors::OperationError;

use super::RoomRepository;
use crate::DbPool;

pub struct SqlRoomRepository {
    pool: DbPool,
}

impl SqlRoomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RoomRepository for SqlRoomRepository {
    async fn find_available(
        &self,
        num_people: i64,
        check_in: &str,
        check_out: &str,
    ) -> Result<Availability, OperationError> {
        let window = StayWindow::parse(check_in, check_out)?;

        // Prices are canonical decimal TEXT; CAST keeps the ordering numeric.
        let rows = sqlx::query(
            "SELECT
                r.room_id,
                r.room_number,
                rt.name AS room_type,
                rt.capacity,
                rt.price,
                b.name AS building,
                rt.extra_bed_included,
                rt.extra_bed_price
             FROM room r
             JOIN room_type rt ON r.room_type_id = rt.room_type_id
             JOIN building b ON rt.building_id = b.building_id
             WHERE rt.capacity >= ?
               AND r.is_active = 1
               AND r.room_id NOT IN (
                   SELECT room_id
                   FROM booking
                   WHERE check_in_datetime < ?
                     AND check_out_datetime > ?
               )
             ORDER BY CAST(rt.price AS REAL) ASC, rt.capacity DESC",
        )
        .bind(num_people)
        .bind(window.check_out_stored())
        .bind(window.check_in_stored())
        .fetch_all(&self.pool)
        .await
        .map_err(OperationError::storage)?;

        let rooms = rows.into_iter().map(offer_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(Availability { rooms })
    }

    async fn rate_for_room(&self, room_id: RoomId) -> Result<Option<RoomRate>, OperationError> {
        let row = sqlx::query(
            "SELECT rt.capacity, rt.price, rt.extra_bed_included, rt.extra_bed_price
             FROM room r
             JOIN room_type rt ON r.room_type_id = rt.room_type_id
             WHERE r.room_id = ?",
        )
        .bind(room_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(OperationError::storage)?;

        row.map(rate_from_row).transpose()
    }
}

fn offer_from_row(row: SqliteRow) -> Result<RoomOffer, OperationError> {
    Ok(RoomOffer {
        room_id: RoomId(row.try_get("room_id").map_err(OperationError::storage)?),
        room_number: row.try_get("room_number").map_err(OperationError::storage)?,
        room_type: row.try_get("room_type").map_err(OperationError::storage)?,
        max_guests: row.try_get("capacity").map_err(OperationError::storage)?,
        price_per_night: parse_stored_decimal(
            "price",
            row.try_get("price").map_err(OperationError::storage)?,
        )?,
        building: row.try_get("building").map_err(OperationError::storage)?,
        extra_bed_included: row.try_get("extra_bed_included").map_err(OperationError::storage)?,
        extra_bed_price: parse_stored_decimal(
            "extra_bed_price",
            row.try_get("extra_bed_price").map_err(OperationError::storage)?,
        )?,
    })
}

fn rate_from_row(row: SqliteRow) -> Result<RoomRate, OperationError> {
    Ok(RoomRate {
        capacity: row.try_get("capacity").map_err(OperationError::storage)?,
        price_per_night: parse_stored_decimal(
            "price",
            row.try_get("price").map_err(OperationError::storage)?,
        )?,
        extra_bed_included: row.try_get("extra_bed_included").map_err(OperationError::storage)?,
        extra_bed_price: parse_stored_decimal(
            "extra_bed_price",
            row.try_get("extra_bed_price").map_err(OperationError::storage)?,
        )?,
    })
}

fn parse_stored_decimal(column: &str, value: String) -> Result<Decimal, OperationError> {
    value.parse::<Decimal>().map_err(|error| {
        OperationError::storage(format!("invalid decimal in `{column}`: `{value}` ({error})"))
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use staybook_core::domain::room::RoomId;
    use staybook_core::errors::OperationError;

    use super::SqlRoomRepository;
    use crate::fixtures::ReferenceSeedDataset;
    use crate::repositories::RoomRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect test pool");
        migrations::run_pending(&pool).await.expect("run migrations");
        ReferenceSeedDataset::load(&pool).await.expect("load seed");
        pool
    }

    async fn insert_booking(pool: &DbPool, room_id: i64, check_in: &str, check_out: &str) {
        let guest_id: i64 = sqlx::query_scalar(
            "INSERT INTO guest (name, phone, city)
             VALUES ('Test Guest', ?, 'Test City')
             ON CONFLICT(phone) DO UPDATE SET name = excluded.name
             RETURNING guest_id",
        )
        .bind(format!("+91-88000000{room_id}"))
        .fetch_one(pool)
        .await
        .expect("insert guest");

        sqlx::query(
            "INSERT INTO booking (
                guest_id, building_id, room_id, num_persons,
                check_in_datetime, check_out_datetime,
                days_charged, extra_beds, extra_bed_price,
                subtotal_amount, taxes_and_fees, total_price,
                advance_due_amount, status_id
             ) VALUES (
                ?, 1, ?, 2,
                ?, ?,
                2, 0, '0.00',
                '2000.00', '0.00', '2000.00',
                '200.00',
                (SELECT booking_status_id FROM booking_status WHERE code = 'REQUESTED')
             )",
        )
        .bind(guest_id)
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .execute(pool)
        .await
        .expect("insert booking");
    }

    fn room_ids(availability: &staybook_core::domain::room::Availability) -> Vec<i64> {
        availability.rooms.iter().map(|offer| offer.room_id.0).collect()
    }

    #[tokio::test]
    async fn overlapping_booking_excludes_the_room() {
        let pool = setup_pool().await;
        insert_booking(&pool, 101, "2025-05-10 14:00:00", "2025-05-12 11:00:00").await;

        let repo = SqlRoomRepository::new(pool.clone());
        let availability = repo
            .find_available(2, "2025-05-11 00:00", "2025-05-13 00:00")
            .await
            .expect("query availability");

        assert!(!room_ids(&availability).contains(&101), "booked room must be excluded");
        assert!(room_ids(&availability).contains(&102), "sibling room stays available");
        pool.close().await;
    }

    #[tokio::test]
    async fn touching_windows_do_not_exclude_the_room() {
        let pool = setup_pool().await;
        insert_booking(&pool, 101, "2025-05-10 14:00:00", "2025-05-12 11:00:00").await;

        let repo = SqlRoomRepository::new(pool.clone());
        let availability = repo
            .find_available(2, "2025-05-12 11:00", "2025-05-14 00:00")
            .await
            .expect("query availability");

        assert!(
            room_ids(&availability).contains(&101),
            "a window starting at the prior check-out must not exclude the room",
        );
        pool.close().await;
    }

    #[tokio::test]
    async fn orders_by_price_then_capacity() {
        let pool = setup_pool().await;
        let repo = SqlRoomRepository::new(pool.clone());

        let availability =
            repo.find_available(2, "2025-05-10 14:00", "2025-05-12 11:00").await.expect("query");

        let offers = &availability.rooms;
        assert_eq!(offers[0].price_per_night, Decimal::new(100000, 2), "cheapest first");

        let family_position = offers
            .iter()
            .position(|offer| offer.room_type == "Family Suite")
            .expect("family suite present");
        let deluxe_position = offers
            .iter()
            .position(|offer| offer.room_type == "Deluxe")
            .expect("deluxe present");
        assert!(
            family_position < deluxe_position,
            "at equal price the larger room sorts first",
        );
        pool.close().await;
    }

    #[tokio::test]
    async fn inactive_rooms_never_appear() {
        let pool = setup_pool().await;
        let repo = SqlRoomRepository::new(pool.clone());

        let availability =
            repo.find_available(1, "2025-05-10 14:00", "2025-05-12 11:00").await.expect("query");

        assert!(!room_ids(&availability).contains(&103), "room 103 is seeded inactive");
        pool.close().await;
    }

    #[tokio::test]
    async fn zero_matches_is_a_successful_empty_result() {
        let pool = setup_pool().await;
        let repo = SqlRoomRepository::new(pool.clone());

        let availability = repo
            .find_available(10, "2025-12-24 14:00", "2025-12-25 11:00")
            .await
            .expect("query should succeed with zero matches");

        assert_eq!(availability.count(), 0);
        assert!(availability.rooms.is_empty());
        pool.close().await;
    }

    #[tokio::test]
    async fn unparseable_window_is_a_validation_error() {
        let pool = setup_pool().await;
        let repo = SqlRoomRepository::new(pool.clone());

        let error = repo
            .find_available(2, "next friday", "2025-05-12 11:00")
            .await
            .expect_err("garbage timestamp should fail");

        assert!(matches!(error, OperationError::InvalidDateTime(_)));
        pool.close().await;
    }

    #[tokio::test]
    async fn rate_resolves_for_known_room_and_not_for_unknown() {
        let pool = setup_pool().await;
        let repo = SqlRoomRepository::new(pool.clone());

        let rate = repo.rate_for_room(RoomId(201)).await.expect("query rate").expect("rate exists");
        assert_eq!(rate.price_per_night, Decimal::new(150000, 2));
        assert_eq!(rate.capacity, 2);
        assert!(rate.extra_bed_included);

        let missing = repo.rate_for_room(RoomId(999)).await.expect("query rate");
        assert!(missing.is_none());
        pool.close().await;
    }
}
