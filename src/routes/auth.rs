//! # 인증 핸들러
//!
//! ## 엔드포인트
//! - `POST /auth/register` → 회원가입 (201)
//! - `POST /auth/login` → 폼 로그인, refresh 토큰 쿠키 발급
//! - `POST /auth/token` → refresh 토큰 쿠키로 액세스 토큰(JWT) 발급
//! - `POST /auth/logout` → refresh 토큰 만료 처리, 쿠키 삭제
//!
//! refresh 토큰은 HttpOnly 쿠키로만 주고받고, 도서 API는 `Authorization: Bearer` 액세스 토큰을 씁니다.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{Duration, Utc};

use crate::{
    db::tokens as db_tokens,
    error::AppError,
    middleware::auth::{
        cookie_value, create_access_token, expired_refresh_cookie, generate_refresh_token,
        hash_token, refresh_cookie, AuthError, SessionUser, TIMESTAMP_FORMAT,
    },
    models::*,
    routes::{
        extract::{Form, Json},
        AppState,
    },
    services::accounts,
};

/// `POST /auth/register`: 일반 사용자(role = user)로 가입합니다.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = accounts::create_account(&state.pool, &state.config, req.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /auth/login`: 로그인 성공 시 refresh 토큰을 저장하고 쿠키로 내려줍니다.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts::authenticate(&state.pool, &form.username, &form.password)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let refresh_token = generate_refresh_token();
    let token_id = uuid::Uuid::now_v7().to_string();
    let expires_at = (Utc::now() + Duration::seconds(state.config.refresh_token_exp_seconds))
        .format(TIMESTAMP_FORMAT)
        .to_string();

    db_tokens::store_refresh_token(
        &state.pool,
        &token_id,
        user.id,
        &hash_token(&refresh_token),
        &expires_at,
    )
    .await?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        [(SET_COOKIE, refresh_cookie(&state.config, &refresh_token))],
        Json(DetailResponse::login()),
    ))
}

/// `POST /auth/token`: 로그인한 사용자에게 새 액세스 토큰을 발급합니다.
pub async fn token(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let access_token = create_access_token(&session.user, &state.config)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(AccessTokenResponse::new(access_token)))
}

/// `POST /auth/logout`: 쿠키가 없어도 성공으로 응답합니다.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = cookie_value(&headers, &state.config.refresh_token_key) {
        if let Some(stored) = db_tokens::find_refresh_token(&state.pool, &hash_token(token)).await? {
            let expired_at = (Utc::now() - Duration::days(1))
                .format(TIMESTAMP_FORMAT)
                .to_string();
            db_tokens::expire_refresh_token(&state.pool, &stored.id, &expired_at).await?;
            tracing::info!(user_id = stored.user_id, "user logged out");
        }
    }

    Ok((
        [(SET_COOKIE, expired_refresh_cookie(&state.config))],
        Json(DetailResponse::logout()),
    ))
}
