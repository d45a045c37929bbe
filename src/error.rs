//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//! - `messages`: 클라이언트에 그대로 노출되는 도메인 에러 메시지
//!
//! 응답 본문 형식: `{ "error": { "code": "not_found", "message": "User not found." } }`

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::auth::AuthError;

/// 클라이언트에 노출되는 도메인 에러 메시지
pub mod messages {
    pub const EMAIL_TAKEN: &str = "Email is already taken.";
    pub const USERNAME_TAKEN: &str = "Username is already taken.";
    pub const USER_NOT_FOUND: &str = "User not found.";
    pub const USER_NOT_LIBRARY_MEMBER: &str = "User is not a library member.";
    pub const CONTACT_INFORMATION_NOT_PROVIDED: &str =
        "Contact information must be provided for a new library member.";

    pub const BOOK_NOT_FOUND: &str = "Book(s) not found.";
    pub const CATEGORY_NOT_FOUND: &str = "Category(s) not found.";
    pub const SEARCH_QUERY_EMPTY: &str = "Search query cannot be empty.";
    pub const ISBN_NOT_VALID: &str = "ISBN must be a 10-digit number";
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 형식은 맞지만 검증을 통과하지 못한 입력 (HTTP 422)
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    /// 요청 본문을 읽거나 파싱하지 못함 (HTTP 400, 415, 422 등 추출기가 정한 상태 코드)
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    /// 인증/인가 실패 (HTTP 401 또는 403)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수에서 반환된 에러에 `?`를 쓰면 자동으로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub fn bad_request(message: &str) -> Self {
        Self::BadRequest(message.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Auth(auth) => return auth.into_response(),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            AppError::InvalidBody { status, message } => {
                let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
                    "validation_error"
                } else {
                    "bad_request"
                };
                (status, code, message)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
