//! HTTP 中间件
//! 应用状态与通用请求中间件

use crate::{
    auth::{jwt::TokenCodec, password::PasswordHasher},
    config::AppConfig,
    error::{AppError, ErrorResponse},
    repository::UserStore,
    services::{AuthService, CredentialValidator, UserService},
};
use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 签名密钥在启动时加载一次，此后只读，请求之间无共享可变状态。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub token_codec: Arc<TokenCodec>,
    pub credential_validator: Arc<CredentialValidator>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// 组装所有服务
    pub fn new(
        config: AppConfig,
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
    ) -> Result<Self, AppError> {
        let token_codec = Arc::new(TokenCodec::from_config(&config)?);
        let store_timeout = Duration::from_millis(config.security.store_timeout_ms);

        let credential_validator = Arc::new(CredentialValidator::new(
            store.clone(),
            hasher.clone(),
            store_timeout,
        ));
        let auth_service = Arc::new(AuthService::new(
            credential_validator.clone(),
            token_codec.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            store,
            hasher,
            credential_validator.clone(),
            store_timeout,
        ));

        Ok(Self {
            config,
            token_codec,
            credential_validator,
            auth_service,
            user_service,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();

        // 指标标签使用静态字符串，避免基数膨胀
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            405 => "405",
            409 => "409",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        // 在响应头中添加 trace_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 错误响应 URL 补全中间件
/// 为所有结构化错误体填入原始请求 URL
pub async fn error_url_middleware(req: Request, next: Next) -> Response {
    let url = request_url(&req);
    let response = next.run(req).await;

    match response.extensions().get::<ErrorResponse>() {
        Some(report) if report.url.is_empty() => report.clone().with_url(url).into_response(),
        _ => response,
    }
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// 还原请求 URL（不含查询串）
fn request_url(req: &Request) -> String {
    let path = req.uri().path();

    if let (Some(scheme), Some(authority)) = (req.uri().scheme_str(), req.uri().authority()) {
        return format!("{}://{}{}", scheme, authority, path);
    }

    match req.headers().get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, path),
        None => path.to_string(),
    }
}
