//! Users Router

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::application::Mailer;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserRole;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::AuthGuard;

const ADMIN: &[UserRole] = &[UserRole::Admin];

/// Routes mounted at `/api/v1/users`
pub fn users_router<U, M>(repo: Arc<U>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let guard = AuthGuard::new(repo.clone(), config.clone());
    let state = AuthAppState {
        repo,
        mailer,
        config,
    };

    let public = Router::new()
        .route("/signup", post(handlers::sign_up::<U, M>))
        .route("/login", post(handlers::login::<U, M>))
        .route("/logout", get(handlers::logout::<U, M>))
        .route("/forgotPassword", post(handlers::forgot_password::<U, M>))
        .route("/resetPassword/{token}", patch(handlers::reset_password::<U, M>));

    let account = guard.protect(
        Router::new()
            .route("/updateMyPassword", patch(handlers::update_my_password::<U, M>))
            .route("/me", get(handlers::get_me))
            .route("/updateMe", patch(handlers::update_me::<U, M>))
            .route("/deleteMe", delete(handlers::delete_me::<U, M>)),
    );

    let admin = guard.restrict(
        Router::new()
            .route(
                "/",
                get(handlers::get_all_users::<U, M>).post(handlers::create_user),
            )
            .route(
                "/{id}",
                get(handlers::get_user::<U, M>)
                    .patch(handlers::update_user::<U, M>)
                    .delete(handlers::delete_user::<U, M>),
            ),
        ADMIN,
    );

    public.merge(account).merge(admin).with_state(state)
}
