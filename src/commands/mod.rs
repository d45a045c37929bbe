//! # CLI 명령
//!
//! - `serve`: HTTP 서버 실행 (기본 명령)
//! - `migrate`: 미적용 마이그레이션만 실행하고 종료
//! - `admin`: 관리자 계정 생성 (`create-admin`)

pub mod admin;
pub mod migrate;
pub mod serve;
