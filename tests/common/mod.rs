//! 통합 테스트 공용 도구
//!
//! 인메모리 SQLite에 마이그레이션을 적용하고, 실제 서버 없이
//! `tower::ServiceExt::oneshot()`으로 라우터를 호출합니다.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use libris::{
    build_router, commands::admin::create_admin, config::Config, db, AppState,
    services::{CacheStore, GoogleBooksClient},
};
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

pub const PASSWORD: &str = "Secret1!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `Set-Cookie` 값에서 `name=value` 부분만 꺼냅니다.
    pub fn cookie(&self) -> Option<String> {
        self.headers
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    pub fn error_message(&self) -> &str {
        self.body["error"]["message"].as_str().unwrap_or_default()
    }
}

pub fn test_config(google_books_api: &str) -> Config {
    let google_books_api = google_books_api.to_string();
    Config::from_lookup(move |key| match key {
        "ENVIRONMENT" => Some("TESTING".to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        "SECURE_COOKIES" => Some("false".to_string()),
        "GOOGLE_BOOKS_API" => Some(google_books_api.clone()),
        _ => None,
    })
    .unwrap()
}

/// 연결이 하나뿐이고 만료되지 않는 인메모리 DB 풀
///
/// `sqlite::memory:`는 연결마다 별도 DB가 생기므로 연결 수를 1로 고정합니다.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

impl TestApp {
    pub async fn new() -> Self {
        // 외부로 나가지 않도록 닫힌 포트를 가리킵니다.
        Self::with_google_books("http://127.0.0.1:9").await
    }

    pub async fn with_google_books(base_url: &str) -> Self {
        Self::with_config(test_config(base_url)).await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = AppState {
            pool: test_pool().await,
            cache: CacheStore::new(1_000),
            google_books: GoogleBooksClient::new(&config.google_books_api).unwrap(),
            config: Arc::new(config),
        };

        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, auth: Auth<'_>) -> TestResponse {
        let request = auth
            .apply(Request::builder().method(Method::GET).uri(uri))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value, auth: Auth<'_>) -> TestResponse {
        let request = auth
            .apply(Request::builder().method(Method::POST).uri(uri))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_empty(&self, uri: &str, auth: Auth<'_>) -> TestResponse {
        let request = auth
            .apply(Request::builder().method(Method::POST).uri(uri))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str, email: &str) -> TestResponse {
        self.post_json(
            "/auth/register",
            json!({ "username": username, "email": email, "password": PASSWORD }),
            Auth::None,
        )
        .await
    }

    pub async fn login_form(&self, username: &str, password: &str) -> TestResponse {
        let form = format!("username={username}&password={password}");
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/login")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(request).await
    }

    /// 로그인 후 `refreshToken=...` 쿠키 문자열을 돌려줍니다.
    pub async fn login(&self, username: &str) -> String {
        let response = self.login_form(username, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.cookie().unwrap()
    }

    pub async fn access_token(&self, cookie: &str) -> String {
        let response = self.post_empty("/auth/token", Auth::Cookie(cookie)).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["access_token"].as_str().unwrap().to_string()
    }

    /// 일반 사용자를 만들고 로그인한 뒤 (id, 쿠키)를 돌려줍니다.
    pub async fn user_session(&self, username: &str) -> (i64, String) {
        let response = self.register(username, &format!("{username}@library.example")).await;
        assert_eq!(response.status, StatusCode::CREATED);
        let id = response.body["id"].as_i64().unwrap();
        (id, self.login(username).await)
    }

    /// 관리자를 만들고 로그인한 뒤 쿠키를 돌려줍니다.
    pub async fn admin_session(&self, username: &str) -> String {
        create_admin(
            &self.state.pool,
            &self.state.config,
            username,
            &format!("{username}@library.example"),
            PASSWORD,
        )
        .await
        .unwrap();
        self.login(username).await
    }

    /// 일반 사용자의 액세스 토큰
    pub async fn reader_token(&self) -> String {
        let (_, cookie) = self.user_session("reader").await;
        self.access_token(&cookie).await
    }
}

#[derive(Clone, Copy)]
pub enum Auth<'a> {
    None,
    Cookie(&'a str),
    Bearer(&'a str),
    /// `Authorization` 헤더 값을 그대로 보냅니다.
    Header(&'a str),
}

impl Auth<'_> {
    fn apply(self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        match self {
            Auth::None => builder,
            Auth::Cookie(cookie) => builder.header(COOKIE, cookie),
            Auth::Bearer(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            Auth::Header(value) => builder.header(AUTHORIZATION, value),
        }
    }
}
