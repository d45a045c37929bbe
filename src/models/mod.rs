//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `auth`: 로그인 폼과 토큰 응답
//! - `book`: 도서, 저자, 카테고리
//! - `user`: 사용자와 도서관 회원
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Book`처럼 짧게 접근합니다.

pub mod auth;
pub mod book;
pub mod user;

pub use auth::*;
pub use book::*;
pub use user::*;
