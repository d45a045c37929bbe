//! # 사용자 관리 핸들러
//!
//! ## 엔드포인트
//! - `POST /users/create` → 사용자 생성 (관리자 전용, 201)
//! - `GET /users/me` → 로그인한 사용자 정보
//! - `POST /users/membership/activate` → 도서관 회원 자격 활성화 (관리자 전용)
//! - `POST /users/membership/block` → 도서관 회원 자격 차단 (관리자 전용)

use axum::{extract::State, http::StatusCode};

use crate::{
    error::AppError,
    middleware::auth::{AdminUser, SessionUser},
    models::*,
    routes::{extract::Json, AppState},
    services::{accounts, membership},
};

pub async fn create_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = accounts::create_account(&state.pool, &state.config, req.into()).await?;
    tracing::info!(admin_id = admin.user.id, user_id = user.id, "admin created a user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn me(session: SessionUser) -> Json<UserResponse> {
    Json(session.user.into())
}

pub async fn activate_membership(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<ChangeMembershipRequest>,
) -> Result<Json<ChangeMembershipResponse>, AppError> {
    let status = membership::activate_membership(
        &state.pool,
        req.user_id,
        req.contact_information.as_deref(),
    )
    .await?;

    Ok(Json(ChangeMembershipResponse {
        user_id: req.user_id,
        current_membership_status: status,
    }))
}

pub async fn block_membership(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<ChangeMembershipRequest>,
) -> Result<Json<ChangeMembershipResponse>, AppError> {
    let status = membership::block_membership(&state.pool, req.user_id).await?;

    Ok(Json(ChangeMembershipResponse {
        user_id: req.user_id,
        current_membership_status: status,
    }))
}
