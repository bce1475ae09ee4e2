//! Database Models
//!
//! Entity structs matching the SurrealDB tables.

pub mod booking;
pub mod closed_day;
pub mod serde_helpers;
pub mod user;

pub use booking::{Booking, BookingId};
pub use closed_day::ClosedDay;
pub use user::{User, UserId};
