pub mod booking;
pub mod guest;
pub mod room;
pub mod stay;
