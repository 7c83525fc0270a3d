//! Query parameter translator
//!
//! [`ApiFeatures`] wraps one collection handle and one set of raw
//! parameters. Each refinement step records its spec and returns the
//! builder; [`ApiFeatures::into_query`] hands the recorded specs to the
//! collection in the fixed order filter, sort, projection, pagination.
//!
//! ```ignore
//! let query = ApiFeatures::new(DocumentQuery::new(), params)
//!     .filter()
//!     .sort()
//!     .limit_fields()
//!     .paginate()
//!     .into_query();
//! ```

use serde::Serialize;

use crate::collection::QueryableCollection;
use crate::params::RawQueryParams;
use crate::spec::{FilterSpec, OrderSpec, PaginationSpec, ProjectionSpec};

/// Specs recorded by the refinement steps that have been requested
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryPlan {
    pub filter: Option<FilterSpec>,
    pub order: Option<OrderSpec>,
    pub projection: Option<ProjectionSpec>,
    pub pagination: Option<PaginationSpec>,
}

/// Builder translating request parameters into collection refinements
#[derive(Debug, Clone)]
pub struct ApiFeatures<C> {
    collection: C,
    params: RawQueryParams,
    plan: QueryPlan,
}

impl<C: QueryableCollection> ApiFeatures<C> {
    /// Holds both inputs verbatim; nothing is validated here
    pub fn new(collection: C, params: RawQueryParams) -> Self {
        Self {
            collection,
            params,
            plan: QueryPlan::default(),
        }
    }

    /// All four refinements, as list endpoints use them
    pub fn apply_all(collection: C, params: RawQueryParams) -> C {
        Self::new(collection, params)
            .filter()
            .sort()
            .limit_fields()
            .paginate()
            .into_query()
    }

    pub fn filter(mut self) -> Self {
        self.plan.filter = Some(self.filter_spec());
        self
    }

    pub fn sort(mut self) -> Self {
        self.plan.order = Some(self.order_spec());
        self
    }

    pub fn limit_fields(mut self) -> Self {
        self.plan.projection = Some(self.projection_spec());
        self
    }

    pub fn paginate(mut self) -> Self {
        self.plan.pagination = Some(self.pagination_spec());
        self
    }

    /// Filter derived from the non-control parameters
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::from_params(&self.params)
    }

    /// Client order; absent, empty or all-blank `sort` means newest first
    pub fn order_spec(&self) -> OrderSpec {
        self.params
            .control("sort")
            .map(OrderSpec::parse)
            .filter(|order| !order.is_empty())
            .unwrap_or_else(OrderSpec::default_order)
    }

    pub fn projection_spec(&self) -> ProjectionSpec {
        self.params
            .control("fields")
            .map(ProjectionSpec::parse)
            .unwrap_or_default()
    }

    pub fn pagination_spec(&self) -> PaginationSpec {
        PaginationSpec::parse(self.params.control("page"), self.params.control("limit"))
    }

    pub fn params(&self) -> &RawQueryParams {
        &self.params
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    /// Apply the requested refinements and return the refined handle
    pub fn into_query(self) -> C {
        let Self {
            mut collection,
            plan,
            ..
        } = self;

        tracing::debug!(
            filter = ?plan.filter,
            order = ?plan.order,
            projection = ?plan.projection,
            pagination = ?plan.pagination,
            "Translated query parameters"
        );

        if let Some(filter) = plan.filter {
            collection = collection.with_filter(filter);
        }
        if let Some(order) = plan.order {
            collection = collection.with_sort(order);
        }
        if let Some(projection) = plan.projection {
            collection = collection.with_projection(projection);
        }
        if let Some(pagination) = plan.pagination {
            collection = collection.with_pagination(pagination);
        }
        collection
    }
}
