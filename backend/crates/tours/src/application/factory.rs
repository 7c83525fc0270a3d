//! Generic CRUD over one resource
//!
//! The same five operations serve tours, reviews and bookings; the
//! [`Resource`] type parameter supplies the rules of each collection.

use chrono::Utc;
use kernel::error::app_error::AppError;
use query::{ApiFeatures, Document, DocumentQuery, FilterSpec, RawQueryParams, eval};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ratings::recalculate_ratings;
use crate::domain::document::{apply_patch, from_body, stamp_new};
use crate::domain::repository::DocumentStore;
use crate::domain::resource::Resource;
use crate::error::{TourError, TourResult};

/// Resource factory use case
pub struct ResourceService<S, R> {
    store: Arc<S>,
    _resource: PhantomData<fn() -> R>,
}

impl<S, R> ResourceService<S, R>
where
    S: DocumentStore + Send + Sync,
    R: Resource,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// Translated list query, confined to the resource scope and `scope`
    pub async fn get_all(
        &self,
        params: RawQueryParams,
        scope: FilterSpec,
    ) -> TourResult<Vec<Document>> {
        let base = DocumentQuery::scoped(R::scope()).and_scope(scope);
        let query = ApiFeatures::apply_all(base, params);

        let documents = self.store.find(R::COLLECTION, &query).await?;
        Ok(documents.into_iter().map(R::present).collect())
    }

    pub async fn get_one(&self, id: &str) -> TourResult<Document> {
        let (_, doc) = self.find_visible(id).await?;
        Ok(R::present(doc))
    }

    pub async fn create_one(&self, body: Value) -> TourResult<Document> {
        let (id, mut doc) = stamp_new(from_body(body)?, Utc::now());
        Self::check(&mut doc)?;

        self.store.insert(R::COLLECTION, id, &doc).await?;
        tracing::info!(collection = %R::COLLECTION, %id, "Document created");

        if let Some(tour_id) = R::rated_tour(&doc) {
            recalculate_ratings(self.store.as_ref(), tour_id).await?;
        }
        Ok(R::present(doc))
    }

    /// Merges `patch` into the stored document and validates the result
    pub async fn update_one(&self, id: &str, patch: Value) -> TourResult<Document> {
        let patch = from_body(patch)?;
        let (id, existing) = self.find_visible(id).await?;

        let mut doc = apply_patch(&existing, patch);
        Self::check(&mut doc)?;

        if !self.store.replace(R::COLLECTION, id, &doc).await? {
            return Err(TourError::NotFound);
        }
        tracing::info!(collection = %R::COLLECTION, %id, "Document updated");

        let before = R::rated_tour(&existing);
        let after = R::rated_tour(&doc);
        for tour_id in before.into_iter().chain(after.filter(|t| Some(*t) != before)) {
            recalculate_ratings(self.store.as_ref(), tour_id).await?;
        }
        Ok(R::present(doc))
    }

    pub async fn delete_one(&self, id: &str) -> TourResult<()> {
        let (id, existing) = self.find_visible(id).await?;

        if !self.store.delete(R::COLLECTION, id).await? {
            return Err(TourError::NotFound);
        }
        tracing::info!(collection = %R::COLLECTION, %id, "Document deleted");

        if let Some(tour_id) = R::rated_tour(&existing) {
            recalculate_ratings(self.store.as_ref(), tour_id).await?;
        }
        Ok(())
    }

    /// Stored document by path id, if the resource scope lets it be seen
    async fn find_visible(&self, id: &str) -> TourResult<(Uuid, Document)> {
        let id = parse_id(id)?;
        let doc = self
            .store
            .find_by_id(R::COLLECTION, id)
            .await?
            .filter(|doc| eval::matches(&R::scope(), doc))
            .ok_or(TourError::NotFound)?;
        Ok((id, doc))
    }

    fn check(doc: &mut Document) -> TourResult<()> {
        R::prepare(doc);
        let errors = R::validate(doc);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TourError::Validation(errors))
        }
    }
}

/// Path id; anything but a UUID is `Invalid id: <value>.`
pub fn parse_id(id: &str) -> TourResult<Uuid> {
    Uuid::parse_str(id).map_err(|e| AppError::invalid_id(id).with_source(e).into())
}
