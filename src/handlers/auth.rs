//! 认证相关的 HTTP 处理器

use super::JsonBody;
use crate::{
    error::AppError,
    middleware::AppState,
    models::{
        auth::{LoginRequest, LoginResponse},
        user::SignUpRequest,
    },
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 登录
/// 令牌同时写入 Authorization 响应头和响应体
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bearer_token = state.auth_service.login(&req).await?;

    Ok((
        StatusCode::OK,
        [(header::AUTHORIZATION, bearer_token.clone())],
        Json(LoginResponse { bearer_token }),
    ))
}

/// 注册
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let response = state.user_service.sign_up(req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}
