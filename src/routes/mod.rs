//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 전체 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 액세스 토큰 발급, 로그아웃
//! - `books`: 도서/카테고리 조회, 검색, 사용자별 이용 불가 카테고리
//! - `extract`: 에러 형식을 맞춘 `Json`/`Form` 추출기
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `users`: 사용자 생성, 내 정보, 도서관 회원 자격

pub mod auth;
pub mod books;
pub mod extract;
pub mod health;
pub mod users;

use std::sync::Arc;

use axum::{
    http::{request::Parts, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    services::{CacheStore, GoogleBooksClient},
};

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// 필드가 모두 내부적으로 Arc를 쓰므로 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub cache: CacheStore,
    pub google_books: GoogleBooksClient,
}

/// 전체 라우터를 만듭니다.
///
/// 배포 환경(STAGING, PRODUCTION)에서는 API 전체가 `/v{APP_VERSION}` 아래에도 마운트됩니다.
/// 접두사를 떼고 전달하는 프록시 뒤에서도 동작하도록 접두사 없는 경로는 그대로 둡니다.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/token", post(auth::token))
        .route("/logout", post(auth::logout));

    let user_routes = Router::new()
        .route("/create", post(users::create_user))
        .route("/me", get(users::me))
        .route("/membership/activate", post(users::activate_membership))
        .route("/membership/block", post(users::block_membership));

    let book_routes = Router::new()
        .route("/by-isbn/{isbn}", get(books::get_book_by_isbn))
        .route("/by-category/{category_name}", get(books::get_books_by_category))
        .route("/category/{category_id}", get(books::get_category))
        .route("/categories", get(books::get_categories))
        .route("/search", post(books::search_books))
        .route(
            "/unavailable_categories/user/{user_id}",
            get(books::get_unavailable_categories),
        )
        .route(
            "/unavailable_categories/user/{user_id}/add",
            post(books::add_unavailable_categories),
        )
        .route(
            "/unavailable_categories/user/{user_id}/remove",
            post(books::remove_unavailable_categories),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/books", book_routes)
        .route("/healthcheck", get(health::health_check));

    let cors = cors_layer(&state.config);
    let prefix = state.config.api_prefix();

    let app = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(&prefix, api_routes.clone()).merge(api_routes)
    };

    app.with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// 설정의 출처 목록과 정규식으로 CORS를 구성합니다.
///
/// refresh 토큰 쿠키를 주고받아야 하므로 credentials를 허용하고,
/// 그 때문에 와일드카드(`*`) 대신 요청 출처를 그대로 돌려주는 방식을 씁니다.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config.cors_origins.clone();
    let origins_regex = config.cors_origins_regex.clone();

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
        let Ok(origin) = origin.to_str() else {
            return false;
        };
        origins.iter().any(|allowed| allowed == origin)
            || origins_regex
                .as_ref()
                .is_some_and(|regex| regex.is_match(origin))
    });

    let headers: Vec<HeaderName> = config
        .cors_headers
        .iter()
        .filter_map(|name| match HeaderName::try_from(name.as_str()) {
            Ok(header) => Some(header),
            Err(_) => {
                tracing::warn!(header = %name, "ignoring invalid CORS header name");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(headers)
}
