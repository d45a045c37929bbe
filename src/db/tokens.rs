//! refresh 토큰 저장소. 토큰 원문 대신 SHA-256 해시만 보관합니다.

use crate::error::AppError;
use crate::models::auth::RefreshToken;
use sqlx::SqlitePool;

pub async fn store_refresh_token(
    pool: &SqlitePool,
    id: &str,
    user_id: i64,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<RefreshToken>, AppError> {
    let row = sqlx::query_as::<_, RefreshToken>(
        r#"
        SELECT id, user_id, expires_at
        FROM refresh_tokens
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 토큰을 지우지 않고 만료 시각을 과거로 옮겨 무효화합니다.
pub async fn expire_refresh_token(
    pool: &SqlitePool,
    id: &str,
    expired_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET expires_at = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(expired_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
