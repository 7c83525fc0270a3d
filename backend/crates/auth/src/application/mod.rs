//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod check_session;
pub mod config;
pub mod mailer;
pub mod password_reset;
pub mod profile;
pub mod sign_in;
pub mod sign_up;
pub mod token;
pub mod update_password;

// Re-exports
pub use admin::{AdminUpdateInput, UserAdminUseCase};
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use mailer::{MailError, Mailer};
pub use password_reset::PasswordResetUseCase;
pub use profile::{ProfileUseCase, UpdateMeInput};
pub use sign_in::SignInUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token::{AccessToken, SessionOutput};
pub use update_password::{UpdatePasswordInput, UpdatePasswordUseCase};
