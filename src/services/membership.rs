//! # 도서관 회원 자격 변경
//!
//! | 현재 상태 | activate | block |
//! |---|---|---|
//! | 회원 아님 | 연락처가 있으면 ACTIVE로 생성, 없으면 400 | 400 |
//! | ACTIVE | 변화 없음 | BLOCKED |
//! | BLOCKED | ACTIVE | 변화 없음 |

use sqlx::SqlitePool;

use crate::{
    db::{members as db_members, users as db_users},
    error::{messages, AppError},
    models::MembershipStatus,
};

pub async fn activate_membership(
    pool: &SqlitePool,
    user_id: i64,
    contact_information: Option<&str>,
) -> Result<MembershipStatus, AppError> {
    ensure_user_exists(pool, user_id).await?;

    match db_members::find_membership(pool, user_id).await? {
        None => {
            let contact = contact_information
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| AppError::bad_request(messages::CONTACT_INFORMATION_NOT_PROVIDED))?;

            db_members::create_membership(pool, user_id, contact).await?;
            tracing::info!(user_id, "library membership created");
        }
        Some(member) if member.membership_status == MembershipStatus::Blocked => {
            db_members::set_membership_status(pool, user_id, MembershipStatus::Active).await?;
            tracing::info!(user_id, "library membership reactivated");
        }
        Some(_) => {}
    }

    Ok(MembershipStatus::Active)
}

pub async fn block_membership(pool: &SqlitePool, user_id: i64) -> Result<MembershipStatus, AppError> {
    ensure_user_exists(pool, user_id).await?;

    let member = db_members::find_membership(pool, user_id)
        .await?
        .ok_or_else(|| AppError::bad_request(messages::USER_NOT_LIBRARY_MEMBER))?;

    if member.membership_status == MembershipStatus::Active {
        db_members::set_membership_status(pool, user_id, MembershipStatus::Blocked).await?;
        tracing::info!(user_id, "library membership blocked");
    }

    Ok(MembershipStatus::Blocked)
}

async fn ensure_user_exists(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    db_users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;
    Ok(())
}
