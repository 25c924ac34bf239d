//! Request-scoped identity
//!
//! The authorization middleware places a fresh [`IdentityContext`] in the
//! request extensions and fills it at most once. Handlers read it through the
//! [`Identity`] and [`AdminIdentity`] extractors.

use crate::{error::AppError, models::user::{UserRecord, UserRole}};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::OnceLock;

/// Who is making the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: UserRole,
    pub display_name: String,
}

impl From<&UserRecord> for Identity {
    fn from(user: &UserRecord) -> Self {
        Self {
            subject: user.username.clone(),
            role: user.role,
            display_name: user.nickname.clone(),
        }
    }
}

/// Write-once holder for the identity of a single request
#[derive(Debug, Clone, Default)]
pub struct IdentityContext {
    slot: OnceLock<Identity>,
}

impl IdentityContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the identity; a second install fails
    pub fn install(&self, identity: Identity) -> Result<(), AppError> {
        self.slot
            .set(identity)
            .map_err(|_| AppError::internal_error("identity already installed for this request"))
    }

    pub fn current_identity(&self) -> Option<&Identity> {
        self.slot.get()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .and_then(IdentityContext::current_identity)
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

/// Identity that must hold the ADMIN role
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if identity.role != UserRole::Admin {
            tracing::warn!(subject = %identity.subject, role = %identity.role, "Admin role required");
            return Err(AppError::Forbidden);
        }
        Ok(AdminIdentity(identity))
    }
}
