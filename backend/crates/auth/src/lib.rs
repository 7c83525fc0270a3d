//! Users and Authentication Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database, in-memory and mail implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Signup/login with email + password
//! - Stateless HMAC-signed access tokens (Bearer header or `jwt` cookie)
//! - Password reset by mailed one-time token
//! - Role-based access (user, guide, lead-guide, admin)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Tokens issued before a password change are rejected
//! - Reset tokens stored only as SHA-256 hashes, valid for 10 minutes
//! - Deactivated accounts are invisible to every lookup

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::user::User;
pub use domain::repository::UserRepository;
pub use domain::value_object::UserRole;
pub use error::{AuthError, AuthResult};
pub use infra::{LogMailer, MemoryUserRepository, PgUserRepository};
pub use presentation::middleware::{AuthGuard, CurrentUser};
pub use presentation::router::users_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
