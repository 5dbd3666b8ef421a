use std::time::Instant;

use serde::Serialize;

use crate::commands::CommandResult;
use staybook_core::config::{AppConfig, LoadOptions};
use staybook_core::domain::booking::NewBooking;
use staybook_core::domain::guest::NewGuest;
use staybook_core::pricing::price_stay;
use staybook_db::repositories::{BookingRepository, GuestRepository, RoomRepository};
use staybook_db::{
    connect_with_settings, migrations, ReferenceSeedDataset, SqlBookingRepository,
    SqlGuestRepository, SqlRoomRepository,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.push(skipped("db_connectivity"));
            checks.push(skipped("migration_visibility"));
            checks.push(skipped("booking_round_trip"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.push(skipped("migration_visibility"));
            checks.push(skipped("booking_round_trip"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let db_started = Instant::now();
    let db_result = runtime.block_on(async {
        connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
    });

    let pool = match db_result {
        Ok(pool) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Pass,
                elapsed_ms: db_started.elapsed().as_millis() as u64,
                message: format!("connected using `{}`", config.database.url),
            });
            pool
        }
        Err(error) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Fail,
                elapsed_ms: db_started.elapsed().as_millis() as u64,
                message: format!("failed to connect: {error}"),
            });
            checks.push(skipped("migration_visibility"));
            checks.push(skipped("booking_round_trip"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let migration_started = Instant::now();
    let migration_result = runtime.block_on(async { migrations::run_pending(&pool).await });
    runtime.block_on(async {
        pool.close().await;
    });

    match migration_result {
        Ok(()) => checks.push(SmokeCheck {
            name: "migration_visibility",
            status: SmokeStatus::Pass,
            elapsed_ms: migration_started.elapsed().as_millis() as u64,
            message: "migrations are visible and executable".to_string(),
        }),
        Err(error) => checks.push(SmokeCheck {
            name: "migration_visibility",
            status: SmokeStatus::Fail,
            elapsed_ms: migration_started.elapsed().as_millis() as u64,
            message: format!("migration execution failed: {error}"),
        }),
    }

    // The round trip runs against a throwaway in-memory store so smoke never
    // writes bookings into the operator's configured database.
    let round_trip_started = Instant::now();
    let round_trip_result = runtime.block_on(booking_round_trip());
    checks.push(match round_trip_result {
        Ok(reference_code) => SmokeCheck {
            name: "booking_round_trip",
            status: SmokeStatus::Pass,
            elapsed_ms: round_trip_started.elapsed().as_millis() as u64,
            message: format!("guest -> availability -> booking produced {reference_code}"),
        },
        Err(error) => SmokeCheck {
            name: "booking_round_trip",
            status: SmokeStatus::Fail,
            elapsed_ms: round_trip_started.elapsed().as_millis() as u64,
            message: error,
        },
    });

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

async fn booking_round_trip() -> Result<String, String> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("failed to open scratch store: {error}"))?;
    migrations::run_pending(&pool)
        .await
        .map_err(|error| format!("failed to migrate scratch store: {error}"))?;
    ReferenceSeedDataset::load(&pool)
        .await
        .map_err(|error| format!("failed to seed scratch store: {error}"))?;

    let guests = SqlGuestRepository::new(pool.clone());
    let rooms = SqlRoomRepository::new(pool.clone());
    let ledger = SqlBookingRepository::new(pool.clone());

    let guest = guests
        .upsert(NewGuest {
            name: "Smoke Guest".to_string(),
            phone: "+91-9999999999".to_string(),
            city: "Bengaluru".to_string(),
        })
        .await
        .map_err(|error| format!("guest upsert failed: {error}"))?;

    let availability = rooms
        .find_available(2, "2025-05-10 14:00", "2025-05-12 11:00")
        .await
        .map_err(|error| format!("availability query failed: {error}"))?;
    let offer = availability
        .rooms
        .first()
        .ok_or_else(|| "expected at least one seeded room to be available".to_string())?;

    let rate = rooms
        .rate_for_room(offer.room_id)
        .await
        .map_err(|error| format!("rate lookup failed: {error}"))?
        .ok_or_else(|| "offered room has no rate".to_string())?;
    let pricing = price_stay(&rate, 2, 0).map_err(|error| format!("pricing failed: {error}"))?;

    let confirmation = ledger
        .create(NewBooking {
            guest_id: guest.guest.id,
            room_id: offer.room_id,
            num_persons: 2,
            check_in_datetime: "2025-05-10 14:00".to_string(),
            check_out_datetime: "2025-05-12 11:00".to_string(),
            days_charged: 2,
            extra_beds: 0,
            extra_bed_price: rate.extra_bed_price,
            subtotal_amount: pricing.subtotal_amount,
            taxes_and_fees: pricing.taxes_and_fees,
            total_price: pricing.total_price,
            advance_due_amount: pricing.advance_due_amount,
        })
        .await
        .map_err(|error| format!("booking create failed: {error}"))?;

    pool.close().await;
    Ok(confirmation.reference_code)
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
