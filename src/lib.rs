//! # Libris: 도서관 관리 API
//!
//! 실행 파일(`main.rs`)과 통합 테스트(`tests/`)가 함께 쓰는 라이브러리 크레이트입니다.
//!
//! 모듈 구성:
//! - `commands`: CLI 명령 (serve, migrate, create-admin)
//! - `config`: 환경변수 설정
//! - `db`: SQLite 데이터 접근 계층
//! - `error`: 에러 타입과 HTTP 응답 변환
//! - `middleware`: 토큰 발급/검증과 인증 추출기
//! - `models`: 요청/응답/DB 행 구조체
//! - `routes`: HTTP 핸들러와 라우터 구성
//! - `services`: 계정, 회원 자격, 캐시, Google Books 연동

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use routes::{build_router, AppState};
