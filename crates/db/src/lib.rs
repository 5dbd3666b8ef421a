pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{BuildingSeedInfo, ReferenceSeedDataset, SeedResult, VerificationResult};
pub use repositories::{
    BookingRepository, GuestRepository, RepositoryError, RoomRepository, SqlBookingRepository,
    SqlGuestRepository, SqlRoomRepository,
};
