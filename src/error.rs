//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    RequestMalformed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token missing")]
    TokenMissing,

    #[error("Token malformed")]
    TokenMalformed,

    #[error("Token signature invalid")]
    SignatureInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Password does not match")]
    SecretMismatch,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("User not found")]
    IdentityNotFound,

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Username already taken")]
    IdentifierTaken,

    #[error("User store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RequestMalformed(_)
            | AppError::Validation(_)
            | AppError::TokenMissing
            | AppError::TokenMalformed
            | AppError::SignatureInvalid => StatusCode::BAD_REQUEST,
            AppError::TokenExpired | AppError::SecretMismatch | AppError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::IdentityNotFound | AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::IdentifierTaken => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_)
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 稳定的错误码，供客户端程序化区分
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::RequestMalformed(_) => "REQUEST_MALFORMED",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenMalformed => "TOKEN_MALFORMED",
            AppError::SignatureInvalid => "SIGNATURE_INVALID",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::SecretMismatch => "SECRET_MISMATCH",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::IdentityNotFound => "IDENTITY_NOT_FOUND",
            AppError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::IdentifierTaken => "IDENTIFIER_TAKEN",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::RequestMalformed(_) => "Malformed JSON request body".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::TokenMissing => "Invalid token: bearer token not found".to_string(),
            AppError::TokenMalformed => "Invalid token: malformed JWT".to_string(),
            AppError::SignatureInvalid => "Invalid token: signature mismatch".to_string(),
            AppError::TokenExpired => "Token has expired".to_string(),
            AppError::SecretMismatch => "Password does not match".to_string(),
            AppError::Unauthenticated => "Authentication required".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::IdentityNotFound => "User not found".to_string(),
            AppError::RouteNotFound(_) => "No such endpoint".to_string(),
            AppError::MethodNotAllowed => "Method not allowed for this endpoint".to_string(),
            AppError::IdentifierTaken => "Username is already taken".to_string(),
            AppError::StoreUnavailable(_) => "User store unavailable".to_string(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub fn internal_error(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

/// 错误响应 DTO
///
/// `url` 在错误产生处通常未知，由最外层的 `error_url_middleware` 补全。
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub date: String,
    pub state: u16,
    pub code: &'static str,
    pub message: String,
    pub url: String,
}

impl ErrorResponse {
    pub fn new(error: &AppError, url: impl Into<String>) -> Self {
        Self {
            date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            state: error.code(),
            code: error.kind(),
            message: error.user_message(),
            url: url.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.state).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.clone())).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 记录错误日志
        if status.is_server_error() {
            tracing::error!(code = self.code(), kind = self.kind(), message = %self, "Application error");
        } else {
            tracing::warn!(code = self.code(), kind = self.kind(), message = %self, "Request rejected");
        }

        ErrorResponse::new(&self, String::new()).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// 存储调用超时
impl From<tokio::time::error::Elapsed> for AppError {
    fn from(e: tokio::time::error::Elapsed) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

/// DTO 字段校验失败
impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let message = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Validation(message)
    }
}
