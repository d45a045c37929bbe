//! 관리자 계정 생성 명령
//!
//! ```bash
//! libris create-admin --username admin --email admin@library.example --password 'S3cret!'
//! ADMIN_PASSWORD='S3cret!' libris create-admin --username admin --email admin@library.example
//! ```
//!
//! 회원가입과 같은 검증(이메일 형식, 비밀번호 규칙, 중복 검사)을 거친 뒤 role = admin으로 저장합니다.

use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    db,
    error::AppError,
    models::{NewUser, User, UserRole},
    services::accounts,
};

pub async fn create_admin(
    pool: &SqlitePool,
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let new_admin = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: UserRole::Admin,
    };

    accounts::create_account(pool, config, new_admin).await
}

/// DB에 연결해 마이그레이션을 적용한 뒤 관리자를 만듭니다.
pub async fn run(config: &Config, username: &str, email: &str, password: &str) -> anyhow::Result<()> {
    let pool = db::connect(config)
        .await
        .context("failed to connect to the database")?;
    db::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    tracing::info!("Creating admin: {} ({})", username, email);
    let admin = create_admin(&pool, config, username, email, password)
        .await
        .context("Error creating admin")?;

    tracing::info!("Admin created successfully! ID: {}", admin.id);
    pool.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
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

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "JWT_SECRET" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn creates_an_admin() {
        let pool = test_pool().await;
        let admin = create_admin(&pool, &test_config(), "root", "root@library.example", "Secret1!")
            .await
            .unwrap();

        assert!(admin.is_admin());
        assert_ne!(admin.password_hash, "Secret1!");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_before_username() {
        let pool = test_pool().await;
        let config = test_config();
        create_admin(&pool, &config, "root", "root@library.example", "Secret1!")
            .await
            .unwrap();

        let err = create_admin(&pool, &config, "root", "root@library.example", "Secret1!")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == crate::error::messages::EMAIL_TAKEN));

        let err = create_admin(&pool, &config, "root", "other@library.example", "Secret1!")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == crate::error::messages::USERNAME_TAKEN));
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let pool = test_pool().await;
        let err = create_admin(&pool, &test_config(), "root", "root@library.example", "password")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unprocessable(_)));
    }
}
