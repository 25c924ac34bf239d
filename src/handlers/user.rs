//! 用户相关的 HTTP 处理器

use super::JsonBody;
use crate::{
    auth::{AdminIdentity, Identity},
    error::AppError,
    middleware::AppState,
    models::user::{PasswordCheckRequest, ProfileResponse, UpdateUserRequest},
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 获取当前用户信息
pub async fn get_current_user(identity: Identity) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        username: identity.subject,
        nickname: identity.display_name,
        role: identity.role,
    })
}

/// 修改昵称和密码
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let response = state.user_service.update_user(&identity.subject, req).await?;

    Ok(Json(response))
}

/// 注销当前账户
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    JsonBody(req): JsonBody<PasswordCheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    state
        .user_service
        .delete_user(&identity.subject, &req.password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 管理员连通性检查
pub async fn admin_ping(AdminIdentity(identity): AdminIdentity) -> impl IntoResponse {
    Json(json!({
        "message": "pong",
        "username": identity.subject,
        "role": identity.role,
    }))
}
