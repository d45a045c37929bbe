//! # 계정 생성과 로그인 검증
//!
//! 회원가입(`POST /auth/register`), 관리자의 사용자 생성(`POST /users/create`),
//! CLI의 `create-admin`이 모두 `create_account()`를 거칩니다.

use sqlx::SqlitePool;

use crate::{
    config::Config,
    db::users as db_users,
    error::{messages, AppError},
    models::{NewUser, User},
    services::password,
};

/// 입력을 검증하고 새 계정을 만듭니다.
///
/// 검사 순서: 사용자명 → 이메일 형식 → 비밀번호 규칙(422) → 이메일 중복 → 사용자명 중복(400)
pub async fn create_account(
    pool: &SqlitePool,
    config: &Config,
    new_user: NewUser,
) -> Result<User, AppError> {
    let username = new_user.username.trim();
    if username.is_empty() {
        return Err(AppError::Unprocessable("Username must not be empty".to_string()));
    }
    password::validate_email(&new_user.email)?;
    password::validate_password(
        &new_user.password,
        config.min_password_length,
        config.max_password_length,
    )?;

    if db_users::find_by_email(pool, &new_user.email).await?.is_some() {
        return Err(AppError::bad_request(messages::EMAIL_TAKEN));
    }
    if db_users::find_by_username(pool, username).await?.is_some() {
        return Err(AppError::bad_request(messages::USERNAME_TAKEN));
    }

    let password_hash = password::hash_password(&new_user.password)?;

    // 동시에 같은 값으로 가입한 경우 UNIQUE 제약이 마지막 방어선입니다.
    let user = db_users::create_user(pool, username, &new_user.email, &password_hash, new_user.role)
        .await
        .map_err(unique_violation_to_bad_request)?;

    tracing::info!(user_id = user.id, role = ?user.role, "account created");
    Ok(user)
}

/// 사용자명과 비밀번호가 맞으면 사용자를 돌려줍니다.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(user) = db_users::find_by_username(pool, username).await? else {
        return Ok(None);
    };

    if !password::verify_password(password, &user.password_hash)? {
        return Ok(None);
    }

    Ok(Some(user))
}

fn unique_violation_to_bad_request(error: AppError) -> AppError {
    match &error {
        AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            if db_err.message().contains("users.email") {
                AppError::bad_request(messages::EMAIL_TAKEN)
            } else {
                AppError::bad_request(messages::USERNAME_TAKEN)
            }
        }
        _ => error,
    }
}
