//! PostgreSQL Document Store Implementation
//!
//! Each collection is a table of `(id uuid primary key, doc jsonb)`.
//! Unique keys are expression indexes on `doc` (see the migrations), so
//! violations surface as SQLSTATE 23505 and map to duplicate-field errors.

use query::{Document, DocumentQuery};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::collection::Collection;
use crate::domain::repository::DocumentStore;
use crate::error::TourResult;

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, id: Uuid, doc: &Document) -> TourResult<()> {
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.table());
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> TourResult<Option<Document>> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection.table());
        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.and_then(into_document))
    }

    async fn find(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> TourResult<Vec<Document>> {
        let mut builder = query::sql::select_documents(collection.table(), query);
        let rows: Vec<Json<Value>> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;

        let documents = rows.into_iter().filter_map(into_document);
        Ok(match query.projection() {
            Some(projection) => documents
                .map(|doc| query::eval::project(projection, &doc))
                .collect(),
            None => documents.collect(),
        })
    }

    async fn replace(&self, collection: Collection, id: Uuid, doc: &Document) -> TourResult<bool> {
        let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", collection.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> TourResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn into_document(Json(value): Json<Value>) -> Option<Document> {
    match value {
        Value::Object(doc) => Some(doc),
        _ => None,
    }
}
