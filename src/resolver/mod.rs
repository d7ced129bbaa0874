//! Entity services
//!
//! Each resolver owns one pipeline and shapes its [`Resolution`] into the
//! payload a caller cares about.
//!
//! [`Resolution`]: crate::models::Resolution

mod attractions;
mod hotels;
mod photos;

pub use attractions::AttractionResolver;
pub use hotels::{HotelResolution, HotelResolver};
pub use photos::{PhotoResolution, PhotoResolver};
