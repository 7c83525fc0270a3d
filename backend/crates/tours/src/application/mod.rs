//! Application Layer - Use cases

pub mod factory;
pub mod ratings;
pub mod tours;

pub use factory::{ResourceService, parse_id};
pub use ratings::{recalculate_ratings, reviews_of};
pub use tours::{TourService, alias_top_tours};
