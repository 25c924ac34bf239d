//! JWT token issuing and verification
//!
//! Tokens are HS256-signed, carry a fixed TTL and travel as
//! `"Bearer " + <compact JWS>`. There is no refresh or revocation: a token is
//! valid until `exp`, and a leaked token stays usable until then.

use crate::{config::AppConfig, error::AppError, models::user::UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Scheme prefix on the wire
pub const BEARER_PREFIX: &str = "Bearer ";

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (unique username)
    pub sub: String,

    /// User role
    pub role: UserRole,

    /// Username, mirrors `sub`
    pub username: String,

    /// Display name
    pub nickname: String,

    /// Issued at
    pub iat: i64,

    /// Expiration, always `iat + ttl`
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a process-wide symmetric key
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenCodec {
    /// Create a codec from raw key material (at least 256 bits for HS256)
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self, AppError> {
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 bytes)".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        })
    }

    /// Create codec from config, decoding the base64 secret
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.decoded_jwt_secret()?;
        Self::new(&secret, config.security.token_ttl_secs)
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a prefixed token valid for the configured TTL from now
    pub fn issue(&self, subject: &str, role: UserRole, display_name: &str) -> Result<String, AppError> {
        self.issue_at(subject, role, display_name, Utc::now())
    }

    /// Issue a prefixed token with an explicit issue time
    pub fn issue_at(
        &self,
        subject: &str,
        role: UserRole,
        display_name: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expiration = issued_at + Duration::seconds(self.ttl_secs as i64);

        let claims = Claims {
            sub: subject.to_string(),
            role,
            username: subject.to_string(),
            nickname: display_name.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        let compact = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to encode token: {:?}", e);
                AppError::Internal(format!("Failed to encode token: {}", e))
            })?;

        Ok(format!("{}{}", BEARER_PREFIX, compact))
    }

    /// Remove the scheme prefix from a raw `Authorization` value
    pub fn strip(raw_header_value: &str) -> Result<&str, AppError> {
        if raw_header_value.trim().is_empty() {
            return Err(AppError::TokenMissing);
        }

        raw_header_value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AppError::TokenMissing)
    }

    /// Verify the signature, then decode and check expiry.
    ///
    /// The signature is checked before any claim is trusted, so a forged
    /// token reports `SignatureInvalid` even when its `exp` has passed.
    pub fn verify_and_decode(&self, token_body: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token_body, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                match e.kind() {
                    ErrorKind::InvalidSignature => AppError::SignatureInvalid,
                    ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::TokenMalformed,
                }
            })
    }
}
