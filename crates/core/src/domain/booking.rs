use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::guest::GuestId;
use crate::domain::room::RoomId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub i64);

/// Booking lifecycle codes. Only `Requested` is ever assigned here;
/// confirmation and cancellation belong to an administrative workflow
/// outside this core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "REQUESTED" => Some(Self::Requested),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Caller-supplied booking request. Every financial and quantity field is
/// pre-computed by the caller; the ledger records them verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub num_persons: i64,
    pub check_in_datetime: String,
    pub check_out_datetime: String,
    pub days_charged: i64,
    pub extra_beds: i64,
    pub extra_bed_price: Decimal,
    pub subtotal_amount: Decimal,
    pub taxes_and_fees: Decimal,
    pub total_price: Decimal,
    pub advance_due_amount: Decimal,
}

impl NewBooking {
    /// The display echo of the stay and financial fields, mirrored without
    /// recomputation.
    pub fn details(&self) -> StayDetails {
        StayDetails {
            num_persons: self.num_persons,
            check_in_datetime: self.check_in_datetime.clone(),
            check_out_datetime: self.check_out_datetime.clone(),
            days_charged: self.days_charged,
            extra_beds: self.extra_beds,
            extra_bed_price: self.extra_bed_price,
            subtotal_amount: self.subtotal_amount,
            taxes_and_fees: self.taxes_and_fees,
            total_price: self.total_price,
            advance_due_amount: self.advance_due_amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayDetails {
    pub num_persons: i64,
    pub check_in_datetime: String,
    pub check_out_datetime: String,
    pub days_charged: i64,
    pub extra_beds: i64,
    pub extra_bed_price: Decimal,
    pub subtotal_amount: Decimal,
    pub taxes_and_fees: Decimal,
    pub total_price: Decimal,
    pub advance_due_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: BookingId,
    pub reference_code: String,
    pub message: String,
    pub details: StayDetails,
}
