//! Query Translator
//!
//! Turns the string-typed query parameters of a list request into four
//! refinement specs and applies them to a lazily executed collection:
//!
//! ```text
//! ?difficulty=easy&duration[gte]=5&sort=-price&fields=name,price&page=2&limit=5
//!   filter      {difficulty: "easy", duration: {$gte: "5"}}
//!   sort        [(price, desc)]
//!   projection  include {name, price}
//!   pagination  {skip: 5, limit: 5}
//! ```
//!
//! - `params` - [`RawQueryParams`], bracket-notation aware
//! - `spec` - filter / order / projection / pagination value types
//! - `translator` - [`ApiFeatures`], the immutable builder
//! - `collection` - [`QueryableCollection`] and the concrete [`DocumentQuery`]
//! - `eval` - executes a [`DocumentQuery`] over JSON documents in memory
//! - `sql` - compiles a [`DocumentQuery`] to PostgreSQL (feature `sqlx`)

pub mod collection;
pub mod eval;
pub mod params;
pub mod spec;
#[cfg(feature = "sqlx")]
pub mod sql;
pub mod translator;

#[cfg(test)]
mod tests;

pub use collection::{Document, DocumentQuery, QueryableCollection};
pub use params::{RawQueryParams, RawValue};
pub use spec::{
    ComparisonOp, FilterKey, FilterSpec, FilterValue, OrderSpec, PaginationSpec, ProjectionSpec,
    SortDirection, SortKey,
};
pub use translator::{ApiFeatures, QueryPlan};
