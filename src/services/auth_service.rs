//! 认证服务：登录与令牌签发

use crate::{
    auth::jwt::TokenCodec,
    error::AppError,
    models::auth::LoginRequest,
    services::CredentialValidator,
};
use std::sync::Arc;

pub struct AuthService {
    validator: Arc<CredentialValidator>,
    token_codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(validator: Arc<CredentialValidator>, token_codec: Arc<TokenCodec>) -> Self {
        Self {
            validator,
            token_codec,
        }
    }

    /// 用户登录，成功时返回带前缀的令牌
    pub async fn login(&self, req: &LoginRequest) -> Result<String, AppError> {
        let outcome = self.authenticate_and_issue(req).await;

        match &outcome {
            Ok(_) => {
                metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
                tracing::info!(username = %req.username, "Login succeeded");
            }
            Err(e) => {
                metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
                tracing::info!(username = %req.username, kind = e.kind(), "Login failed");
            }
        }

        outcome
    }

    async fn authenticate_and_issue(&self, req: &LoginRequest) -> Result<String, AppError> {
        let user = self.validator.authenticate(&req.username, &req.password).await?;
        self.token_codec.issue(&user.username, user.role, &user.nickname)
    }
}
