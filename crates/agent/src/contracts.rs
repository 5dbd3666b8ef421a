//! Typed request/response shapes for the tools. The orchestration layer
//! marshals the agent's plan into these; amounts travel as decimals and are
//! rendered with the currency symbol only in display fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use staybook_core::domain::booking::StayDetails;
use staybook_core::domain::guest::{Guest, GuestId};
use staybook_core::domain::room::{RoomId, RoomOffer};
use staybook_core::domain::stay::STAY_DATETIME_FORMAT;
use staybook_core::pricing::format_price;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuestUpsertRequest {
    pub name: String,
    pub phone: String,
    pub city: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuestUpsertResponse {
    pub new_guest: bool,
    pub guest: GuestView,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuestView {
    pub guest_id: i64,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub created_at: String,
}

impl From<Guest> for GuestView {
    fn from(guest: Guest) -> Self {
        Self {
            guest_id: guest.id.0,
            name: guest.name,
            phone: guest.phone,
            city: guest.city,
            created_at: guest.created_at.format(STAY_DATETIME_FORMAT).to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub num_people: i64,
    pub check_in: String,
    pub check_out: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub given_input_specifications: AvailabilityEcho,
    pub available_rooms: Vec<RoomOfferView>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityEcho {
    pub num_people: i64,
    pub check_in: String,
    pub check_out: String,
    pub result_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomOfferView {
    pub room_id: i64,
    pub room_number: String,
    pub room_type: String,
    pub max_guests: i64,
    pub price_per_night: String,
    pub building: String,
    pub extra_bed_included: bool,
    pub extra_bed_price: String,
}

impl From<RoomOffer> for RoomOfferView {
    fn from(offer: RoomOffer) -> Self {
        Self {
            room_id: offer.room_id.0,
            room_number: offer.room_number,
            room_type: offer.room_type,
            max_guests: offer.max_guests,
            price_per_night: format_price(offer.price_per_night),
            building: offer.building,
            extra_bed_included: offer.extra_bed_included,
            extra_bed_price: format_price(offer.extra_bed_price),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StayPriceRequest {
    pub room_id: i64,
    pub days_charged: i64,
    #[serde(default)]
    pub extra_beds: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StayPriceResponse {
    pub room_id: i64,
    pub days_charged: i64,
    pub extra_beds: i64,
    pub subtotal_amount: Decimal,
    pub taxes_and_fees: Decimal,
    pub total_price: Decimal,
    pub advance_due_amount: Decimal,
    pub display_total: String,
    pub display_advance_due: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingCreateRequest {
    pub guest_id: i64,
    pub room_id: i64,
    pub num_persons: i64,
    pub check_in_datetime: String,
    pub check_out_datetime: String,
    pub days_charged: i64,
    #[serde(default)]
    pub extra_beds: i64,
    #[serde(default)]
    pub extra_bed_price: Decimal,
    pub subtotal_amount: Decimal,
    pub taxes_and_fees: Decimal,
    pub total_price: Decimal,
    pub advance_due_amount: Decimal,
}

impl BookingCreateRequest {
    pub fn room_id(&self) -> RoomId {
        RoomId(self.room_id)
    }

    pub fn guest_id(&self) -> GuestId {
        GuestId(self.guest_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingCreateResponse {
    pub system_booking_id: i64,
    pub reference_code: String,
    pub message: String,
    pub details: StayDetails,
}
