use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomTypeId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub i64);

/// One bookable room surfaced by the availability query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOffer {
    pub room_id: RoomId,
    pub room_number: String,
    pub room_type: String,
    pub max_guests: i64,
    pub price_per_night: Decimal,
    pub building: String,
    pub extra_bed_included: bool,
    pub extra_bed_price: Decimal,
}

/// Availability query result. Zero matches is a successful result with an
/// empty list, distinct from a query error by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub rooms: Vec<RoomOffer>,
}

impl Availability {
    pub fn count(&self) -> usize {
        self.rooms.len()
    }
}

/// Pricing-relevant attributes of a room's class, used to quote a stay
/// before a booking is requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRate {
    pub capacity: i64,
    pub price_per_night: Decimal,
    pub extra_bed_included: bool,
    pub extra_bed_price: Decimal,
}
