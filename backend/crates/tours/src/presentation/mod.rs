//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ToursState;
pub use router::{bookings_router, reviews_router, tours_router};
