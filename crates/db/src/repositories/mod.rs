use async_trait::async_trait;
use thiserror::Error;

use staybook_core::domain::booking::{BookingConfirmation, NewBooking};
use staybook_core::domain::guest::{GuestUpsertOutcome, NewGuest};
use staybook_core::domain::room::{Availability, RoomId, RoomRate};
use staybook_core::errors::OperationError;

pub mod booking;
pub mod guest;
pub mod room;

pub use booking::SqlBookingRepository;
pub use guest::SqlGuestRepository;
pub use room::SqlRoomRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for OperationError {
    fn from(error: RepositoryError) -> Self {
        OperationError::storage(error)
    }
}

/// Guest directory: idempotent identity resolution keyed by phone number.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn upsert(&self, guest: NewGuest) -> Result<GuestUpsertOutcome, OperationError>;
}

/// Availability queries over the room inventory. Read-only.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_available(
        &self,
        num_people: i64,
        check_in: &str,
        check_out: &str,
    ) -> Result<Availability, OperationError>;

    async fn rate_for_room(&self, room_id: RoomId) -> Result<Option<RoomRate>, OperationError>;
}

/// Append-only booking ledger.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: NewBooking) -> Result<BookingConfirmation, OperationError>;
}
