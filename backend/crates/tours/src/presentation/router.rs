//! Tours, Reviews and Bookings Routers

use auth::{AuthGuard, UserRepository, UserRole};
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::domain::repository::DocumentStore;
use crate::domain::{Booking, Review, Tour};
use crate::presentation::handlers::{self, ToursState};

const TOUR_MANAGERS: &[UserRole] = &[UserRole::Admin, UserRole::LeadGuide];
const TOUR_STAFF: &[UserRole] = &[UserRole::Admin, UserRole::LeadGuide, UserRole::Guide];
const REVIEWERS: &[UserRole] = &[UserRole::User];
const REVIEW_EDITORS: &[UserRole] = &[UserRole::User, UserRole::Admin];

/// Routes mounted at `/api/v1/tours`, nested reviews included
pub fn tours_router<S, U>(store: Arc<S>, guard: &AuthGuard<U>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let public = Router::new()
        .route("/", get(handlers::get_all::<S, Tour>))
        .route("/top-5-cheap", get(handlers::top_tours::<S>))
        .route("/tour-stats", get(handlers::tour_stats::<S>))
        .route(
            "/tours-within/{distance}/center/{latlng}/unit/{unit}",
            get(handlers::tours_within::<S>),
        )
        .route("/distances/{latlng}/unit/{unit}", get(handlers::distances::<S>))
        .route("/{id}", get(handlers::get_tour::<S>));

    let staff = guard.restrict(
        Router::new().route("/monthly-plan/{year}", get(handlers::monthly_plan::<S>)),
        TOUR_STAFF,
    );

    let managers = guard.restrict(
        Router::new()
            .route("/", post(handlers::create_one::<S, Tour>))
            .route(
                "/{id}",
                patch(handlers::update_one::<S, Tour>).delete(handlers::delete_one::<S, Tour>),
            ),
        TOUR_MANAGERS,
    );

    let review_readers = guard.protect(
        Router::new().route("/{id}/reviews", get(handlers::get_tour_reviews::<S>)),
    );
    let reviewers = guard.restrict(
        Router::new().route("/{id}/reviews", post(handlers::create_tour_review::<S>)),
        REVIEWERS,
    );

    public
        .merge(staff)
        .merge(managers)
        .merge(review_readers)
        .merge(reviewers)
        .with_state(ToursState { store })
}

/// Routes mounted at `/api/v1/reviews`
pub fn reviews_router<S, U>(store: Arc<S>, guard: &AuthGuard<U>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let readers = guard.protect(
        Router::new()
            .route("/", get(handlers::get_all::<S, Review>))
            .route("/{id}", get(handlers::get_one::<S, Review>)),
    );

    let reviewers = guard.restrict(
        Router::new().route("/", post(handlers::create_review::<S>)),
        REVIEWERS,
    );

    let editors = guard.restrict(
        Router::new().route(
            "/{id}",
            patch(handlers::update_one::<S, Review>).delete(handlers::delete_one::<S, Review>),
        ),
        REVIEW_EDITORS,
    );

    readers
        .merge(reviewers)
        .merge(editors)
        .with_state(ToursState { store })
}

/// Routes mounted at `/api/v1/bookings`
pub fn bookings_router<S, U>(store: Arc<S>, guard: &AuthGuard<U>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    guard
        .restrict(
            Router::new()
                .route(
                    "/",
                    get(handlers::get_all::<S, Booking>).post(handlers::create_one::<S, Booking>),
                )
                .route(
                    "/{id}",
                    get(handlers::get_one::<S, Booking>)
                        .patch(handlers::update_one::<S, Booking>)
                        .delete(handlers::delete_one::<S, Booking>),
                ),
            TOUR_MANAGERS,
        )
        .with_state(ToursState { store })
}
