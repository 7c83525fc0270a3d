//! Tours, Reviews and Bookings Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Document rules per resource, aggregations, store trait
//! - `application/` - The generic resource factory and tour use cases
//! - `infra/` - In-memory and PostgreSQL document stores
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Resources
//! - Tours: public reads, statistics and geo queries; secret tours hidden
//! - Reviews: one per user and tour; keep the tour rating summary current
//! - Bookings: staff only
//!
//! List endpoints accept the translated query parameters of the `query`
//! crate (filters, `sort`, `fields`, `page`, `limit`).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use domain::{Booking, Collection, DocumentStore, Resource, Review, Tour};
pub use error::{TourError, TourResult};
pub use infra::{MemoryDocumentStore, PgDocumentStore};
pub use presentation::router::{bookings_router, reviews_router, tours_router};
