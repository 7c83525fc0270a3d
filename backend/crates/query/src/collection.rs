//! Queryable collections
//!
//! [`QueryableCollection`] is the seam between the translator and a
//! store. [`DocumentQuery`] is the lazily executed implementation used by
//! the document stores: it only records intent, and a store runs it
//! through [`crate::eval`] or [`crate::sql`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::spec::{FilterSpec, OrderSpec, PaginationSpec, ProjectionSpec};

/// A stored record: a JSON object
pub type Document = Map<String, Value>;

/// Chainable refinements of a not yet executed query
pub trait QueryableCollection: Sized {
    fn with_filter(self, filter: FilterSpec) -> Self;
    fn with_sort(self, order: OrderSpec) -> Self;
    fn with_projection(self, projection: ProjectionSpec) -> Self;
    fn with_pagination(self, pagination: PaginationSpec) -> Self;
}

/// Query intent over one collection
///
/// `scope` holds conditions fixed by the server (hidden documents, the
/// parent of a nested route). Client filters are merged into `filter` and
/// can never widen the scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentQuery {
    scope: FilterSpec,
    filter: FilterSpec,
    order: OrderSpec,
    projection: Option<ProjectionSpec>,
    pagination: Option<PaginationSpec>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoped(scope: FilterSpec) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn and_scope(mut self, scope: FilterSpec) -> Self {
        self.scope.merge(scope);
        self
    }

    pub fn scope(&self) -> &FilterSpec {
        &self.scope
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    pub fn projection(&self) -> Option<&ProjectionSpec> {
        self.projection.as_ref()
    }

    pub fn pagination(&self) -> Option<PaginationSpec> {
        self.pagination
    }
}

impl QueryableCollection for DocumentQuery {
    fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter.merge(filter);
        self
    }

    fn with_sort(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    fn with_projection(mut self, projection: ProjectionSpec) -> Self {
        self.projection = Some(projection);
        self
    }

    fn with_pagination(mut self, pagination: PaginationSpec) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
