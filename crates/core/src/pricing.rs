use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::room::RoomRate;
use crate::errors::OperationError;

/// House policy: beyond this the stay needs a larger room, not more beds.
pub const MAX_EXTRA_BEDS: i64 = 2;

/// Advance due is 10% of the total.
const ADVANCE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPricing {
    pub subtotal_amount: Decimal,
    pub taxes_and_fees: Decimal,
    pub total_price: Decimal,
    pub advance_due_amount: Decimal,
}

/// Deterministic stay pricing for the orchestration layer. The booking
/// ledger never calls this: it records whatever charges the caller supplies.
///
/// Taxes are currently zero, so the total equals the subtotal.
pub fn price_stay(
    rate: &RoomRate,
    days_charged: i64,
    extra_beds: i64,
) -> Result<StayPricing, OperationError> {
    if days_charged < 1 {
        return Err(OperationError::Validation(format!(
            "days_charged must be at least 1, got {days_charged}"
        )));
    }
    if !(0..=MAX_EXTRA_BEDS).contains(&extra_beds) {
        return Err(OperationError::Validation(format!(
            "extra_beds must be between 0 and {MAX_EXTRA_BEDS}, got {extra_beds}"
        )));
    }
    if extra_beds > 0 && !rate.extra_bed_included {
        return Err(OperationError::Validation(
            "this room class does not offer extra beds".to_string(),
        ));
    }

    let nights = Decimal::from(days_charged);
    let room_charge = rate.price_per_night * nights;
    let extra_bed_charge = rate.extra_bed_price * Decimal::from(extra_beds) * nights;

    let subtotal_amount = room_charge + extra_bed_charge;
    let taxes_and_fees = Decimal::ZERO;
    let total_price = subtotal_amount + taxes_and_fees;
    let advance_due_amount = (total_price * ADVANCE_RATE).round_dp(2);

    Ok(StayPricing { subtotal_amount, taxes_and_fees, total_price, advance_due_amount })
}

/// Display formatting for guest-facing amounts.
pub fn format_price(amount: Decimal) -> String {
    format!("₹{amount:.2}")
}
