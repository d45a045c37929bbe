//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)와 CLI 명령(commands/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `books`: 도서 조회/검색/저장 (저자, 카테고리 포함)
//! - `categories`: 카테고리와 사용자별 이용 불가 카테고리
//! - `members`: 도서관 회원 자격
//! - `tokens`: refresh 토큰
//! - `users`: 사용자 계정

pub mod books;
pub mod categories;
pub mod members;
pub mod tokens;
pub mod users;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

use crate::config::Config;

/// 설정값으로 SQLite 연결 풀을 만듭니다.
///
/// 외래키(ON DELETE CASCADE)가 동작하도록 연결마다 `foreign_keys`를 켭니다.
/// DB 파일이 들어갈 디렉토리가 없으면 먼저 만듭니다.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if let Some(dir) = options
        .get_filename()
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(dir).await?;
    }

    SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await
}

/// `migrations/` 폴더의 SQL 파일 중 아직 적용되지 않은 것만 순서대로 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
