//! # 서비스 계층
//!
//! 라우트 핸들러와 CLI가 공유하는 비즈니스 규칙과 외부 연동을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `accounts`: 계정 생성 검증과 로그인 확인
//! - `cache`: TTL이 있는 인메모리 캐시 저장소
//! - `google_books`: Google Books API 클라이언트
//! - `membership`: 도서관 회원 자격 활성화/차단
//! - `password`: 비밀번호 해싱과 입력 검증

pub mod accounts;
pub mod cache;
pub mod google_books;
pub mod membership;
pub mod password;

pub use cache::CacheStore;
pub use google_books::GoogleBooksClient;
