pub mod booking;
pub mod service;
pub mod slot;
pub mod user;

pub use booking::{Booking, BookingStatus};
pub use service::Service;
pub use slot::Slot;
pub use user::User;
