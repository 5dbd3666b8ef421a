//! Tool layer for the homestay booking core.
//!
//! An external orchestration layer (the conversational agent runtime) drives
//! multi-turn dialogue and invokes these tools to do the actual work:
//!
//! - `guest_upsert` - resolve guest identity by phone number
//! - `room_availability` - list bookable rooms for a stay window
//! - `stay_price` - deterministic pricing preview for a room and stay
//! - `booking_create` - record a booking and derive its reference code
//!
//! # Safety Principle
//!
//! The LLM is strictly a translator. It never decides prices or availability;
//! those are deterministic answers from the booking core. Tools never raise
//! across the boundary either: malformed input and operation failures come
//! back as tagged `{"error": ...}` payloads the orchestration layer renders
//! as user-facing language.

pub mod contracts;
pub mod tools;

pub use contracts::{
    AvailabilityRequest, AvailabilityResponse, BookingCreateRequest, BookingCreateResponse,
    GuestUpsertRequest, GuestUpsertResponse, RoomOfferView, StayPriceRequest, StayPriceResponse,
};
pub use tools::{
    AvailabilityTool, BookingCreateTool, GuestUpsertTool, StayPriceTool, Tool, ToolRegistry,
};
