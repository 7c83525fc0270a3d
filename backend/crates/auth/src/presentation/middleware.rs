//! Auth Middleware
//!
//! `protect` resolves the access token to a [`CurrentUser`]; `restrict_to`
//! checks the role of that user. Both are route layers, so `protect` must
//! be the outer one.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserRole;
use crate::error::AuthError;

/// Middleware state
pub struct AuthGuard<U> {
    pub repo: Arc<U>,
    pub config: Arc<AuthConfig>,
}

impl<U> Clone for AuthGuard<U> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// The authenticated user, stored in request extensions by [`protect`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<U> AuthGuard<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Require a logged-in user on every route of `router`
    pub fn protect<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(self.clone(), protect::<U>))
    }

    /// Require a logged-in user holding one of `roles`
    pub fn restrict<S>(&self, router: Router<S>, roles: &'static [UserRole]) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.protect(router.route_layer(middleware::from_fn_with_state(roles, restrict_to)))
    }
}

/// Middleware that requires a valid access token
pub async fn protect<U>(
    State(guard): State<AuthGuard<U>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let token = bearer_token(req.headers())
        .or_else(|| extract_cookie(req.headers(), &guard.config.cookie.name));

    let use_case = CheckSessionUseCase::new(guard.repo.clone(), guard.config.clone());
    let user = use_case.execute(token.as_deref()).await?;

    tracing::debug!(user_id = %user.user_id, role = %user.user_role, "Request authenticated");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Middleware that requires the current user to hold one of the roles
pub async fn restrict_to(
    State(roles): State<&'static [UserRole]>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>() else {
        return Err(AuthError::NotLoggedIn);
    };

    if !roles.contains(&user.user_role) {
        tracing::warn!(user_id = %user.user_id, role = %user.user_role, "Role not permitted");
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
