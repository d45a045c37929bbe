//! # 미들웨어 모듈
//!
//! - `auth`: JWT 액세스 토큰, refresh 토큰 쿠키, 인증 추출기(Extractor)

pub mod auth;
