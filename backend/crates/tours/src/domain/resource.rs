//! Resource definitions
//!
//! A [`Resource`] describes one document collection to the generic
//! handlers: how a body is normalised and validated, which documents are
//! visible at all, and what is computed on output.

use query::{Document, FilterSpec};
use kernel::id::TourId;

use crate::domain::collection::Collection;

pub trait Resource: Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Condition every read, update and delete is confined to
    fn scope() -> FilterSpec {
        FilterSpec::new()
    }

    /// Defaults and normalisation, run before [`Resource::validate`]
    fn prepare(_doc: &mut Document) {}

    /// Messages of every violated rule; empty when the document is valid
    fn validate(doc: &Document) -> Vec<String>;

    /// Output shape of a stored document
    fn present(doc: Document) -> Document {
        doc
    }

    /// Tour whose rating summary depends on this document
    fn rated_tour(_doc: &Document) -> Option<TourId> {
        None
    }
}
