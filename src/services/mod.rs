//! Business logic services layer

pub mod auth_service;
pub mod credential_validator;
pub mod user_service;

pub use auth_service::AuthService;
pub use credential_validator::CredentialValidator;
pub use user_service::UserService;
