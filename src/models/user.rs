//! User domain models

use crate::{auth::password::validate_password_policy, error::AppError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::{Validate, ValidationError};

/// User role, carried in the `role` claim and re-checked against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
        }
    }

    /// Authority name as exposed to clients, e.g. `ROLE_USER`
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    /// Case-insensitive, accepts an optional `ROLE_` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Ok(UserRole::Admin),
            "USER" => Ok(UserRole::User),
            other => Err(AppError::Internal(format!("Unknown user role: {}", other))),
        }
    }
}

/// Stored user account
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub nickname: String,
}

/// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(custom(function = "validate_not_blank", message = "username must not be blank"))]
    pub username: String,
    #[validate(custom(function = "validate_password_policy"))]
    pub password: String,
    #[validate(custom(function = "validate_not_blank", message = "nickname must not be blank"))]
    pub nickname: String,
}

/// Single granted authority
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityDto {
    pub authority_name: String,
}

/// Sign-up response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_name: String,
    pub nickname: String,
    pub authorities: Vec<AuthorityDto>,
}

impl From<&UserRecord> for SignUpResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_name: user.username.clone(),
            nickname: user.nickname.clone(),
            authorities: vec![AuthorityDto {
                authority_name: user.role.authority(),
            }],
        }
    }
}

/// Profile update request; the current password must be re-entered
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_not_blank", message = "current password must not be blank"))]
    pub ori_password: String,
    #[validate(custom(function = "validate_password_policy"))]
    pub new_password: String,
    #[validate(custom(function = "validate_not_blank", message = "nickname must not be blank"))]
    pub nickname: String,
}

/// Profile update response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    pub user_name: String,
    pub nickname: String,
}

impl From<&UserRecord> for UpdateUserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_name: user.username.clone(),
            nickname: user.nickname.clone(),
        }
    }
}

/// Password confirmation, used for account deletion
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordCheckRequest {
    #[validate(custom(function = "validate_not_blank", message = "password must not be blank"))]
    pub password: String,
}

/// Current identity as returned by `GET /api/users/me`
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub nickname: String,
    pub role: UserRole,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
