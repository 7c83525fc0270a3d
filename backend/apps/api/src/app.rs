//! Router Assembly
//!
//! Every store is injected, so the same router serves PostgreSQL in
//! `main` and in-memory stores in tests.

use auth::application::Mailer;
use auth::{AuthConfig, AuthGuard, UserRepository, users_router};
use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use kernel::error::app_error::AppError;
use platform::rate_limit::{RateLimitConfig, RateLimitStore};
use std::sync::Arc;
use tours::{DocumentStore, bookings_router, reviews_router, tours_router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::{RateLimitState, rate_limit};

/// Largest accepted request body
pub const BODY_LIMIT_BYTES: usize = 10 * 1024;

/// Stores and settings the router is built from
pub struct AppParts<U, M, D, L> {
    pub users: Arc<U>,
    pub mailer: Arc<M>,
    pub documents: Arc<D>,
    pub limiter: Arc<L>,
    pub auth_config: Arc<AuthConfig>,
    pub rate_limit: Arc<RateLimitConfig>,
}

pub fn build_router<U, M, D, L>(parts: AppParts<U, M, D, L>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
    D: DocumentStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let guard = AuthGuard::new(parts.users.clone(), parts.auth_config.clone());

    let v1 = Router::new()
        .nest("/tours", tours_router(parts.documents.clone(), &guard))
        .nest(
            "/users",
            users_router(parts.users, parts.mailer, parts.auth_config),
        )
        .nest("/reviews", reviews_router(parts.documents.clone(), &guard))
        .nest("/bookings", bookings_router(parts.documents, &guard));

    let limiter = RateLimitState {
        store: parts.limiter,
        config: parts.rate_limit,
    };

    Router::new()
        .nest(
            "/api",
            Router::new()
                .nest("/v1", v1)
                .layer(middleware::from_fn_with_state(limiter, rate_limit::<L>)),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Can't find {uri} on this server!"))
}

/// CORS for the configured frontend origins; invalid entries are skipped
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
