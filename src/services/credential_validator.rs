//! Credential checks against the user store

use crate::{
    auth::password::PasswordHasher,
    error::AppError,
    models::user::UserRecord,
    repository::{with_timeout, UserStore},
};
use std::{sync::Arc, time::Duration};

pub struct CredentialValidator {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    store_timeout: Duration,
}

impl CredentialValidator {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, store_timeout: Duration) -> Self {
        Self {
            store,
            hasher,
            store_timeout,
        }
    }

    /// Fetch the account or fail with `IdentityNotFound`
    pub async fn find_user(&self, identifier: &str) -> Result<UserRecord, AppError> {
        with_timeout(self.store_timeout, self.store.find_by_username(identifier))
            .await?
            .ok_or(AppError::IdentityNotFound)
    }

    /// Registration guard, `IdentifierTaken` if the username exists
    pub async fn check_duplicate(&self, identifier: &str) -> Result<(), AppError> {
        let existing = with_timeout(self.store_timeout, self.store.find_by_username(identifier)).await?;
        if existing.is_some() {
            return Err(AppError::IdentifierTaken);
        }
        Ok(())
    }

    /// Look up the account and check the secret against its stored hash
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<UserRecord, AppError> {
        let user = self.find_user(identifier).await?;

        let matches = self
            .hasher
            .verify_blocking(secret.to_string(), user.password_hash.clone())
            .await?;
        if !matches {
            tracing::info!(username = %identifier, "Password mismatch");
            return Err(AppError::SecretMismatch);
        }

        Ok(user)
    }
}
