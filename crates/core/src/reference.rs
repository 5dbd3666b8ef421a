use chrono::NaiveDateTime;

use crate::domain::room::{BuildingId, RoomId};
use crate::domain::stay::STAY_DATETIME_FORMAT;

/// Derive the human-readable reference code for a booking:
/// `BKG-{building}{DDMM}-{HASH6}-{room}`.
///
/// The code is presentation-only: never stored, recomputed identically for
/// identical inputs. The short hash is for human scannability, not
/// uniqueness; the generated row id remains the real key.
pub fn derive_reference_code(
    building_id: BuildingId,
    room_id: RoomId,
    check_in: NaiveDateTime,
    days_charged: i64,
) -> String {
    let check_in_stored = check_in.format(STAY_DATETIME_FORMAT).to_string();
    let seed = format!("{}{}{}{}", building_id.0, room_id.0, check_in_stored, days_charged);
    let digest = blake3::hash(seed.as_bytes());
    let short_hash = digest.to_hex().as_str()[..6].to_ascii_uppercase();
    let day_month = check_in.format("%d%m");

    format!("BKG-{}{}-{}-{}", building_id.0, day_month, short_hash, room_id.0)
}
