pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod reference;

pub use domain::booking::{BookingConfirmation, BookingId, BookingStatus, NewBooking, StayDetails};
pub use domain::guest::{Guest, GuestId, GuestUpsertOutcome, NewGuest};
pub use domain::room::{Availability, BuildingId, RoomId, RoomOffer, RoomRate, RoomTypeId};
pub use domain::stay::{parse_stay_datetime, StayWindow, STAY_DATETIME_FORMAT};
pub use errors::{ErrorKind, OperationError};
pub use pricing::{format_price, price_stay, StayPricing};
pub use reference::derive_reference_code;

pub use chrono;
