//! HTTP Handlers
//!
//! The factory handlers are generic over the [`Resource`]; the router
//! instantiates them once per collection.

use auth::CurrentUser;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::envelope::{self, Envelope};
use kernel::error::app_error::AppError;
use kernel::id::TourId;
use query::{FilterSpec, RawQueryParams};
use serde_json::Value;
use std::sync::Arc;

use crate::application::{ResourceService, TourService, alias_top_tours, reviews_of};
use crate::domain::repository::DocumentStore;
use crate::domain::resource::Resource;
use crate::domain::{Review, Tour};
use crate::error::TourResult;
use crate::presentation::dto::{PlanData, StatsData};

/// Shared state for resource handlers
pub struct ToursState<S> {
    pub store: Arc<S>,
}

impl<S> Clone for ToursState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

type ListQuery = Query<Vec<(String, String)>>;

// ============================================================================
// Factory
// ============================================================================

/// GET /
pub async fn get_all<S, R>(
    State(state): State<ToursState<S>>,
    Query(pairs): ListQuery,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
    R: Resource,
{
    let documents = ResourceService::<S, R>::new(state.store.clone())
        .get_all(RawQueryParams::from_pairs(pairs), FilterSpec::new())
        .await?;

    Ok(Json(envelope::documents(documents)).into_response())
}

/// GET /{id}
pub async fn get_one<S, R>(
    State(state): State<ToursState<S>>,
    Path(id): Path<String>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
    R: Resource,
{
    let doc = ResourceService::<S, R>::new(state.store.clone())
        .get_one(&id)
        .await?;

    Ok(Json(envelope::single(doc)).into_response())
}

/// POST /
pub async fn create_one<S, R>(
    State(state): State<ToursState<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
    R: Resource,
{
    let Json(body) = payload.map_err(AppError::from)?;

    let doc = ResourceService::<S, R>::new(state.store.clone())
        .create_one(body)
        .await?;

    Ok((StatusCode::CREATED, Json(envelope::single(doc))).into_response())
}

/// PATCH /{id}
pub async fn update_one<S, R>(
    State(state): State<ToursState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
    R: Resource,
{
    let Json(patch) = payload.map_err(AppError::from)?;

    let doc = ResourceService::<S, R>::new(state.store.clone())
        .update_one(&id, patch)
        .await?;

    Ok(Json(envelope::single(doc)).into_response())
}

/// DELETE /{id}
pub async fn delete_one<S, R>(
    State(state): State<ToursState<S>>,
    Path(id): Path<String>,
) -> TourResult<StatusCode>
where
    S: DocumentStore + Send + Sync + 'static,
    R: Resource,
{
    ResourceService::<S, R>::new(state.store.clone())
        .delete_one(&id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Tours
// ============================================================================

/// GET /api/v1/tours/{id}, with the reviews of the tour
pub async fn get_tour<S>(
    State(state): State<ToursState<S>>,
    Path(id): Path<String>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let tour = ResourceService::<S, Tour>::new(state.store.clone())
        .get_one(&id)
        .await?;
    let tour = TourService::new(state.store.clone()).with_reviews(tour).await?;

    Ok(Json(envelope::single(tour)).into_response())
}

/// GET /api/v1/tours/top-5-cheap
pub async fn top_tours<S>(
    State(state): State<ToursState<S>>,
    Query(pairs): ListQuery,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let params = alias_top_tours(RawQueryParams::from_pairs(pairs));
    let documents = ResourceService::<S, Tour>::new(state.store.clone())
        .get_all(params, FilterSpec::new())
        .await?;

    Ok(Json(envelope::documents(documents)).into_response())
}

/// GET /api/v1/tours/tour-stats
pub async fn tour_stats<S>(State(state): State<ToursState<S>>) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let stats = TourService::new(state.store.clone()).stats().await?;

    Ok(Json(Envelope::new(StatsData { stats })).into_response())
}

/// GET /api/v1/tours/monthly-plan/{year}
pub async fn monthly_plan<S>(
    State(state): State<ToursState<S>>,
    Path(year): Path<String>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let plan = TourService::new(state.store.clone())
        .monthly_plan(&year)
        .await?;
    let count = plan.len();

    Ok(Json(Envelope::new(PlanData { plan }).with_results(count)).into_response())
}

/// GET /api/v1/tours/tours-within/{distance}/center/{latlng}/unit/{unit}
pub async fn tours_within<S>(
    State(state): State<ToursState<S>>,
    Path((distance, latlng, unit)): Path<(String, String, String)>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let tours = TourService::new(state.store.clone())
        .within(&distance, &latlng, &unit)
        .await?;
    let count = tours.len();

    Ok(Json(envelope::single(tours).with_results(count)).into_response())
}

/// GET /api/v1/tours/distances/{latlng}/unit/{unit}
pub async fn distances<S>(
    State(state): State<ToursState<S>>,
    Path((latlng, unit)): Path<(String, String)>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let distances = TourService::new(state.store.clone())
        .distances(&latlng, &unit)
        .await?;

    Ok(Json(envelope::single(distances)).into_response())
}

// ============================================================================
// Reviews
// ============================================================================

/// GET /api/v1/tours/{tourId}/reviews
pub async fn get_tour_reviews<S>(
    State(state): State<ToursState<S>>,
    Path(tour_id): Path<String>,
    Query(pairs): ListQuery,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let tour_id: TourId = tour_id.parse()?;
    let documents = ResourceService::<S, Review>::new(state.store.clone())
        .get_all(RawQueryParams::from_pairs(pairs), reviews_of(tour_id))
        .await?;

    Ok(Json(envelope::documents(documents)).into_response())
}

/// POST /api/v1/reviews
pub async fn create_review<S>(
    State(state): State<ToursState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let Json(mut body) = payload.map_err(AppError::from)?;
    default_field(&mut body, "user", user.user_id.to_string());

    create_one::<S, Review>(State(state), Ok(Json(body))).await
}

/// POST /api/v1/tours/{tourId}/reviews
pub async fn create_tour_review<S>(
    State(state): State<ToursState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(tour_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> TourResult<Response>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let tour_id: TourId = tour_id.parse()?;
    let Json(mut body) = payload.map_err(AppError::from)?;
    default_field(&mut body, "tour", tour_id.to_string());
    default_field(&mut body, "user", user.user_id.to_string());

    create_one::<S, Review>(State(state), Ok(Json(body))).await
}

/// Set `field` on an object body unless the client sent it
fn default_field(body: &mut Value, field: &str, value: String) {
    if let Value::Object(doc) = body
        && doc.get(field).is_none_or(Value::is_null)
    {
        doc.insert(field.into(), Value::String(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_field() {
        let mut body = json!({"review": "Great", "tour": null, "user": "someone"});
        default_field(&mut body, "tour", "t".to_string());
        default_field(&mut body, "user", "u".to_string());
        assert_eq!(body, json!({"review": "Great", "tour": "t", "user": "someone"}));

        let mut body = json!(["not", "an", "object"]);
        default_field(&mut body, "tour", "t".to_string());
        assert_eq!(body, json!(["not", "an", "object"]));
    }
}
