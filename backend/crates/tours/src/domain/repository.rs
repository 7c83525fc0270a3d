//! Repository Traits
//!
//! Interface for document persistence. Implementations are in the infra layer.

use query::{Document, DocumentQuery};
use uuid::Uuid;

use crate::domain::collection::Collection;
use crate::error::TourResult;

/// Schemaless document storage, one namespace per [`Collection`]
///
/// Inserts and replaces enforce [`Collection::unique_keys`] and fail with
/// a duplicate-field error.
#[trait_variant::make(DocumentStore: Send)]
pub trait LocalDocumentStore {
    /// Store a new document; `id` must match its `id` field
    async fn insert(&self, collection: Collection, id: Uuid, doc: &Document) -> TourResult<()>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> TourResult<Option<Document>>;

    /// Run a translated query: scope and filter, order, page, projection
    async fn find(&self, collection: Collection, query: &DocumentQuery)
    -> TourResult<Vec<Document>>;

    /// Overwrite a document; `false` if it no longer exists
    async fn replace(&self, collection: Collection, id: Uuid, doc: &Document)
    -> TourResult<bool>;

    /// `false` if nothing was deleted
    async fn delete(&self, collection: Collection, id: Uuid) -> TourResult<bool>;
}
