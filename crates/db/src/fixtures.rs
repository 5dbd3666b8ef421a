use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Canonical reference dataset contract: buildings with their seeded room
/// counts. Guests and bookings are never seeded; those tables belong to the
/// directory and ledger operations.
const SEED_BUILDINGS: &[BuildingSeedInfo] = &[
    BuildingSeedInfo {
        name: "Main House",
        rooms: 6,
        description: "Standard, Deluxe and Family Suite rooms",
    },
    BuildingSeedInfo { name: "Garden Annex", rooms: 2, description: "Garden Cottage rooms" },
];

const SEED_ROOM_TYPE_COUNT: i64 = 4;
const SEED_ROOM_COUNT: i64 = 8;
const SEED_ACTIVE_ROOM_COUNT: i64 = 7;
const SEED_STATUS_CODES: &[&str] = &["REQUESTED", "CONFIRMED", "CANCELLED"];

#[derive(Clone, Copy, Debug)]
pub struct BuildingSeedInfo {
    pub name: &'static str,
    pub rooms: i64,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct SeedResult {
    pub buildings_seeded: Vec<BuildingSeedInfo>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Deterministic reference data for the homestay inventory: buildings, room
/// classes, physical rooms, and the booking status codes the ledger resolves
/// by name.
pub struct ReferenceSeedDataset;

impl ReferenceSeedDataset {
    /// SQL fixture content for the reference dataset.
    pub const SQL: &str = include_str!("../../../config/fixtures/reference_seed_data.sql");

    /// Load the reference dataset into the database. Idempotent: reseeding
    /// replaces the same rows.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult { buildings_seeded: SEED_BUILDINGS.to_vec() })
    }

    /// Verify that seed data exists and matches the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for building in SEED_BUILDINGS {
            let room_count: i64 = sqlx::query_scalar(
                "SELECT COUNT(1)
                 FROM room r
                 JOIN room_type rt ON r.room_type_id = rt.room_type_id
                 JOIN building b ON rt.building_id = b.building_id
                 WHERE b.name = ?1",
            )
            .bind(building.name)
            .fetch_one(pool)
            .await?;
            checks.push((building.name, room_count == building.rooms));
        }

        let room_type_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM room_type").fetch_one(pool).await?;
        checks.push(("room-types", room_type_count == SEED_ROOM_TYPE_COUNT));

        let room_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM room").fetch_one(pool).await?;
        checks.push(("rooms", room_count == SEED_ROOM_COUNT));

        let active_room_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM room WHERE is_active = 1")
                .fetch_one(pool)
                .await?;
        checks.push(("active-rooms", active_room_count == SEED_ACTIVE_ROOM_COUNT));

        for code in SEED_STATUS_CODES {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM booking_status WHERE code = ?1)",
            )
            .bind(code)
            .fetch_one(pool)
            .await?;
            checks.push((*code, present == 1));
        }

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}
