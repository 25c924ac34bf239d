//! HTTP 处理器模块

pub mod auth;
pub mod health;
pub mod user;

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::Uri,
};
use serde::de::DeserializeOwned;

/// JSON 请求体提取器
/// 任何读取或解析失败都统一映射为 REQUEST_MALFORMED
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::RequestMalformed(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::RequestMalformed(e.to_string()))
    }
}

/// 未匹配的路由
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}

/// 路由存在但方法不匹配
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
