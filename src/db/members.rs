use crate::error::AppError;
use crate::models::user::{LibraryMember, MembershipStatus};
use sqlx::SqlitePool;

pub async fn find_membership(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<LibraryMember>, AppError> {
    let member = sqlx::query_as::<_, LibraryMember>(
        r#"
        SELECT user_id, contact_information, membership_status, membership_period
        FROM library_members
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(member)
}

pub async fn create_membership(
    pool: &SqlitePool,
    user_id: i64,
    contact_information: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO library_members (user_id, contact_information, membership_status)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(contact_information)
    .bind(MembershipStatus::Active)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_membership_status(
    pool: &SqlitePool,
    user_id: i64,
    status: MembershipStatus,
) -> Result<(), AppError> {
    sqlx::query("UPDATE library_members SET membership_status = ? WHERE user_id = ?")
        .bind(status)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
