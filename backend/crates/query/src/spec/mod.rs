//! Refinement specs produced by the translator
//!
//! Each spec is a plain value: building one never touches a collection.

pub mod filter;
pub mod order;
pub mod pagination;
pub mod projection;

pub use filter::{ComparisonOp, FilterKey, FilterSpec, FilterValue};
pub use order::{OrderSpec, SortDirection, SortKey};
pub use pagination::PaginationSpec;
pub use projection::ProjectionSpec;
