//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::{
    auth::authorization_middleware,
    handlers,
    middleware::{error_url_middleware, request_tracking_middleware, AppState},
};

pub const HEALTH_PATH: &str = "/health";
pub const CURRENT_USER_PATH: &str = "/api/users/me";
pub const USERS_PATH: &str = "/api/users";
pub const ADMIN_PING_PATH: &str = "/api/admin/ping";

/// 固定的受保护路径，可配置的登录/注册路径不得与之重叠
pub const PROTECTED_PATHS: [&str; 4] = [HEALTH_PATH, CURRENT_USER_PATH, USERS_PATH, ADMIN_PING_PATH];

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    // 公开端点（登录、注册），不经过令牌校验
    let public_routes = Router::new()
        .route(&server.login_path, post(handlers::auth::login))
        .route(&server.signup_path, post(handlers::auth::sign_up));

    // 其余路由都经过令牌校验：携带令牌时必须有效，身份由处理器按需要求
    let protected_routes = Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(CURRENT_USER_PATH, get(handlers::user::get_current_user))
        .route(
            USERS_PATH,
            put(handlers::user::update_user).delete(handlers::user::delete_user),
        )
        .route(ADMIN_PING_PATH, get(handlers::user::admin_ping))
        .route_layer(from_fn_with_state(state.clone(), authorization_middleware));

    // 组合所有路由
    // ServiceBuilder 自上而下执行：追踪最外层，其次补全错误 URL
    // 请求体上限由 JsonBody 读取时检查，超限同样渲染为结构化错误
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_tracking_middleware))
                .layer(from_fn(error_url_middleware))
                .layer(DefaultBodyLimit::max(server.max_body_bytes)),
        )
        .with_state(state)
}
