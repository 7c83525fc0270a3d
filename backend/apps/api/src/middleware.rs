//! Request Rate Limiting

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use platform::client::{client_key, request_client_ip};
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};
use std::sync::Arc;

/// Middleware state
pub struct RateLimitState<S> {
    pub store: Arc<S>,
    pub config: Arc<RateLimitConfig>,
}

impl<S> Clone for RateLimitState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

/// Count the request against its client address; over the limit → 429
pub async fn rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let ip = request_client_ip(&req);
    let key = client_key(ip);

    let result = match state.store.check_and_increment(&key, &state.config).await {
        Ok(result) => result,
        Err(e) => {
            // Counting is best effort; an unavailable store does not block traffic
            tracing::warn!(error = %e, "Rate limit check failed");
            return next.run(req).await;
        }
    };

    let mut response = if result.allowed {
        next.run(req).await
    } else {
        tracing::warn!(client = %key, limit = result.limit, "Rate limit exceeded");
        AppError::too_many_requests(state.config.message.clone()).into_response()
    };

    insert_headers(response.headers_mut(), &result);
    response
}

fn insert_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(result.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(result.remaining));
}
