//! Bearer token authorization middleware
//!
//! Runs before every protected handler. A request without an `Authorization`
//! header passes through anonymously; any token that is present must verify,
//! and its subject must still exist in the user store.

use super::{identity::{Identity, IdentityContext}, jwt::TokenCodec};
use crate::{error::AppError, middleware::AppState};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Verify the bearer token (if any) and install the caller's identity
pub async fn authorization_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = IdentityContext::new();

    let raw = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AppError::TokenMalformed)?,
        None => "",
    };

    if raw.trim().is_empty() {
        tracing::debug!("No bearer token, continuing anonymously");
        req.extensions_mut().insert(context);
        return Ok(next.run(req).await);
    }

    let token = TokenCodec::strip(raw)?;
    let claims = state.token_codec.verify_and_decode(token)?;

    // Role and nickname come from the stored record, not the token
    let user = state.credential_validator.find_user(&claims.sub).await?;
    let identity = Identity::from(&user);
    if identity.role != claims.role {
        tracing::debug!(
            subject = %identity.subject,
            token_role = %claims.role,
            stored_role = %identity.role,
            "Role changed since token was issued"
        );
    }

    tracing::debug!(subject = %identity.subject, role = %identity.role, "Identity installed");
    context.install(identity)?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
