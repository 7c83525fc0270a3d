//! Domain Layer - Business logic and document rules
//!
//! This layer contains:
//! - Collections and the generic document helpers
//! - Resource definitions (Tour, Review, Booking)
//! - Domain services (statistics, monthly plan, rating summary, geometry)
//! - Repository traits (interfaces)

pub mod booking;
pub mod collection;
pub mod document;
pub mod geo;
pub mod repository;
pub mod resource;
pub mod review;
pub mod services;
pub mod tour;

pub use booking::Booking;
pub use collection::Collection;
pub use repository::DocumentStore;
pub use resource::Resource;
pub use review::Review;
pub use tour::Tour;
