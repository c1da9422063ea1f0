pub mod booking;
pub mod claims;

pub use booking::{Booking, BookingStatus, NewBooking, StatusUpdate};
pub use claims::{Claims, Identity};
