//! # 카테고리 / 사용자별 이용 불가 카테고리 쿼리 모듈

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

pub async fn get_category(pool: &SqlitePool, id: i64) -> Result<Option<CategoryResponse>, AppError> {
    let category = sqlx::query_as::<_, CategoryResponse>(
        "SELECT id, name FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategoryResponse>, AppError> {
    let categories = sqlx::query_as::<_, CategoryResponse>(
        "SELECT id, name FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn list_unavailable_categories(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<CategoryResponse>, AppError> {
    let categories = sqlx::query_as::<_, CategoryResponse>(
        r#"
        SELECT c.id, c.name
        FROM categories c
        JOIN user_unavailable_categories uc ON uc.category_id = c.id
        WHERE uc.user_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// 사용자에게 이용 불가 카테고리를 추가합니다.
///
/// 존재하지 않는 카테고리 ID는 조용히 건너뛰고, 이미 추가된 카테고리는 중복되지 않습니다.
pub async fn add_unavailable_categories(
    pool: &SqlitePool,
    user_id: i64,
    category_ids: &[i64],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    for category_id in category_ids {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_unavailable_categories (user_id, category_id)
            SELECT ?, id FROM categories WHERE id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn remove_unavailable_categories(
    pool: &SqlitePool,
    user_id: i64,
    category_ids: &[i64],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    for category_id in category_ids {
        sqlx::query("DELETE FROM user_unavailable_categories WHERE user_id = ? AND category_id = ?")
            .bind(user_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
