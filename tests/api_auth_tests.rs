//! 认证 API 集成测试

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use token_auth_service::{auth::TokenCodec, models::user::UserRole};

mod common;
use common::{
    body_json, create_test_app, json_request, login, sign_up, TEST_NICKNAME, TEST_PASSWORD,
    TEST_USERNAME,
};

#[tokio::test]
async fn test_sign_up_success() {
    let app = create_test_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/users",
            None,
            json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD, "nickname": TEST_NICKNAME }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["userName"], TEST_USERNAME);
    assert_eq!(json["nickname"], TEST_NICKNAME);
    assert_eq!(json["authorities"][0]["authorityName"], "ROLE_USER");
    assert!(json.get("password").is_none());
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_sign_up_duplicate_username() {
    let app = create_test_app();

    assert_eq!(
        sign_up(&app, TEST_USERNAME, TEST_PASSWORD, TEST_NICKNAME).await,
        StatusCode::CREATED
    );

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/users",
            None,
            json!({ "username": TEST_USERNAME, "password": "9o8i7u6y!", "nickname": "서에 번쩍" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "IDENTIFIER_TAKEN");
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_sign_up_weak_password() {
    let app = create_test_app();

    for password in ["short1!", "password", "12345678", "abcd1234", "abcd1234!abcd1234!abc"] {
        let status = sign_up(&app, TEST_USERNAME, password, TEST_NICKNAME).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "password {:?}", password);
    }
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app();
    sign_up(&app, TEST_USERNAME, TEST_PASSWORD, TEST_NICKNAME).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let header_token = response
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .expect("Authorization header missing");

    let json = body_json(response).await;
    let body_token = json["bearerToken"].as_str().unwrap();

    assert!(body_token.starts_with("Bearer "));
    assert_eq!(header_token, body_token);

    // 令牌主体为账户名，有效期恰好为配置的 TTL
    let claims = app
        .state
        .token_codec
        .verify_and_decode(TokenCodec::strip(body_token).unwrap())
        .unwrap();
    assert_eq!(claims.sub, TEST_USERNAME);
    assert_eq!(claims.role, UserRole::User);
    assert_eq!(claims.nickname, TEST_NICKNAME);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();
    sign_up(&app, TEST_USERNAME, TEST_PASSWORD, TEST_NICKNAME).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": TEST_USERNAME, "password": "wrongpass" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::AUTHORIZATION).is_none());

    let json = body_json(response).await;
    assert_eq!(json["state"], 401);
    assert_eq!(json["code"], "SECRET_MISMATCH");
    assert_eq!(json["url"], "http://localhost:3000/api/auth/login");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = create_test_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "NoSuchUser", "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "IDENTITY_NOT_FOUND");
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = create_test_app();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\": \"Hong\""))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REQUEST_MALFORMED");
    // 无 Host 头时只回填路径
    assert_eq!(json["url"], "/api/auth/login");
}

#[tokio::test]
async fn test_login_ignores_invalid_authorization_header() {
    let app = create_test_app();
    sign_up(&app, TEST_USERNAME, TEST_PASSWORD, TEST_NICKNAME).await;

    // 登录端点不经过令牌校验
    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            Some("Bearer not.a.token"),
            json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_tokens_are_independent() {
    let app = create_test_app();
    sign_up(&app, TEST_USERNAME, TEST_PASSWORD, TEST_NICKNAME).await;

    let first = login(&app, TEST_USERNAME, TEST_PASSWORD).await;
    let second = login(&app, TEST_USERNAME, TEST_PASSWORD).await;

    // 两个令牌都可用
    for token in [&first, &second] {
        let response = app
            .send(common::empty_request("GET", "/api/users/me", Some(token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
