//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::envelope::{self, Envelope};
use kernel::error::app_error::AppError;
use platform::cookie::set_cookie_header;
use query::RawQueryParams;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AdminUpdateInput, Mailer, PasswordResetUseCase, ProfileUseCase, SessionOutput, SignInUseCase,
    SignUpInput, SignUpUseCase, UpdateMeInput, UpdatePasswordInput, UpdatePasswordUseCase,
    UserAdminUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignUpRequest, StatusResponse,
    UpdateMeRequest, UpdatePasswordRequest, UpdateUserRequest, UserData,
};
use crate::presentation::middleware::CurrentUser;

/// Value the `jwt` cookie is overwritten with on logout
const LOGGED_OUT: &str = "loggedOut";

/// Shared state for auth handlers
pub struct AuthAppState<U, M> {
    pub repo: Arc<U>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<U, M> Clone for AuthAppState<U, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up / Login / Logout
// ============================================================================

/// POST /api/v1/users/signup
pub async fn sign_up<U, M>(
    State(state): State<AuthAppState<U, M>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    let output = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            password_confirm: req.password_confirm,
        })
        .await?;

    Ok(send_token(&state.config, output, StatusCode::CREATED))
}

/// POST /api/v1/users/login
pub async fn login<U, M>(
    State(state): State<AuthAppState<U, M>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(req.email, req.password).await?;

    Ok(send_token(&state.config, output, StatusCode::OK))
}

/// GET /api/v1/users/logout
pub async fn logout<U, M>(State(state): State<AuthAppState<U, M>>) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let cookie = state.config.cookie.build_expiring_cookie(LOGGED_OUT, 10);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(StatusResponse::success()),
    )
        .into_response()
}

// ============================================================================
// Passwords
// ============================================================================

/// POST /api/v1/users/forgotPassword
pub async fn forgot_password<U, M>(
    State(state): State<AuthAppState<U, M>>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<StatusResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case =
        PasswordResetUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    use_case.forgot(req.email).await?;

    Ok(Json(StatusResponse::success().with_message("Token sent to email!")))
}

/// PATCH /api/v1/users/resetPassword/{token}
pub async fn reset_password<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Path(token): Path<String>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case =
        PasswordResetUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    let output = use_case
        .reset(&token, req.password, req.password_confirm)
        .await?;

    Ok(send_token(&state.config, output, StatusCode::OK))
}

/// PATCH /api/v1/users/updateMyPassword
pub async fn update_my_password<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let use_case = UpdatePasswordUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(
            user,
            UpdatePasswordInput {
                password_current: req.password_current,
                password: req.password,
                password_confirm: req.password_confirm,
            },
        )
        .await?;

    Ok(send_token(&state.config, output, StatusCode::OK))
}

// ============================================================================
// Current user
// ============================================================================

/// GET /api/v1/users/me
pub async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Response {
    Json(envelope::single(user.to_document())).into_response()
}

/// PATCH /api/v1/users/updateMe
pub async fn update_me<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<UpdateMeRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let input = UpdateMeInput {
        has_password_fields: req.password.is_some() || req.password_confirm.is_some(),
        name: req.name,
        email: req.email,
    };
    let user = ProfileUseCase::new(state.repo.clone())
        .update_me(user, input)
        .await?;

    Ok(Json(Envelope::new(UserData {
        user: user.to_document(),
    }))
    .into_response())
}

/// DELETE /api/v1/users/deleteMe
pub async fn delete_me<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AuthResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    ProfileUseCase::new(state.repo.clone())
        .delete_me(user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Administration
// ============================================================================

/// GET /api/v1/users
pub async fn get_all_users<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let documents = UserAdminUseCase::new(state.repo.clone())
        .list(RawQueryParams::from_pairs(pairs))
        .await?;

    Ok(Json(envelope::documents(documents)).into_response())
}

/// POST /api/v1/users
pub async fn create_user() -> AuthResult<Response> {
    Err(AuthError::UseSignup)
}

/// GET /api/v1/users/{id}
pub async fn get_user<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Path(id): Path<String>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let user = UserAdminUseCase::new(state.repo.clone()).get(&id).await?;

    Ok(Json(envelope::single(user.to_document())).into_response())
}

/// PATCH /api/v1/users/{id}
pub async fn update_user<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let user = UserAdminUseCase::new(state.repo.clone())
        .update(
            &id,
            AdminUpdateInput {
                name: req.name,
                email: req.email,
                role: req.role,
                photo: req.photo,
            },
        )
        .await?;

    Ok(Json(envelope::single(user.to_document())).into_response())
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user<U, M>(
    State(state): State<AuthAppState<U, M>>,
    Path(id): Path<String>,
) -> AuthResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    UserAdminUseCase::new(state.repo.clone()).delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// `{status, token, data: {user}}` plus the `jwt` cookie
fn send_token(config: &AuthConfig, output: SessionOutput, status: StatusCode) -> Response {
    let cookie = config.cookie.build_set_cookie(&output.token);
    let body = Envelope::new(UserData {
        user: output.user.to_document(),
    })
    .with_token(output.token);

    (
        status,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(body),
    )
        .into_response()
}
