use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE, WWW_AUTHENTICATE},
        request::Parts,
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, NaiveDateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{
    config::Config,
    db::{tokens as db_tokens, users as db_users},
    error::AppError,
    models::User,
    routes::AppState,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const REFRESH_TOKEN_LENGTH: usize = 64;
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub is_admin: bool,
}

/// Bearer 액세스 토큰으로 인증된 사용자 (도서 API)
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// refresh 토큰 쿠키로 인증된 사용자
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
}

/// refresh 토큰 쿠키로 인증된 관리자
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::AccessTokenRequired)?;

        let token = bearer_token(auth_header).ok_or(AuthError::AccessTokenRequired)?;

        let claims = verify_access_token(token, &state.config)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::AccessTokenInvalid)?;

        let user = db_users::find_by_id(&state.pool, user_id)
            .await?
            .ok_or(AuthError::AccessTokenInvalid)?;

        Ok(AuthUser { user })
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, &state.config.refresh_token_key)
            .ok_or(AuthError::AuthRequired)?;

        let stored = db_tokens::find_refresh_token(&state.pool, &hash_token(token))
            .await?
            .ok_or(AuthError::RefreshTokenNotValid)?;

        if is_expired(&stored.expires_at)? {
            return Err(AuthError::RefreshTokenNotValid.into());
        }

        let user = db_users::find_by_id(&state.pool, stored.user_id)
            .await?
            .ok_or(AuthError::RefreshTokenNotValid)?;

        Ok(SessionUser { user })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionUser { user } = SessionUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::warn!(user_id = user.id, "non-admin user attempted an admin action");
            return Err(AuthError::AuthorizationFailed.into());
        }

        Ok(AdminUser { user })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required.")]
    AuthRequired,
    #[error("Refresh token is not valid.")]
    RefreshTokenNotValid,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Authorization failed. User has no access.")]
    AuthorizationFailed,
    #[error("Access token is required in the Authorization header.")]
    AccessTokenRequired,
    #[error("Access token has expired. Get a new one.")]
    AccessTokenExpired,
    #[error("Invalid token.")]
    AccessTokenInvalid,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AuthError::AuthRequired => (StatusCode::UNAUTHORIZED, "authentication_required"),
            AuthError::RefreshTokenNotValid => (StatusCode::UNAUTHORIZED, "refresh_token_not_valid"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AuthError::AuthorizationFailed => (StatusCode::FORBIDDEN, "authorization_failed"),
            AuthError::AccessTokenRequired => (StatusCode::FORBIDDEN, "missing_token"),
            AuthError::AccessTokenExpired => (StatusCode::FORBIDDEN, "expired_token"),
            AuthError::AccessTokenInvalid => (StatusCode::FORBIDDEN, "invalid_token"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

pub fn create_access_token(
    user: &User,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_access_token(user, config, Duration::minutes(config.jwt_exp_minutes))
}

pub fn issue_access_token(
    user: &User,
    config: &Config,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        is_admin: user.is_admin(),
    };

    encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

pub fn verify_access_token(token: &str, config: &Config) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(config.jwt_algorithm),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::AccessTokenExpired,
        _ => AuthError::AccessTokenInvalid,
    })?;

    Ok(token_data.claims)
}

/// `Authorization` 헤더 값에서 Bearer 토큰을 꺼냅니다. 스킴 이름은 대소문자를 구분하지 않습니다.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// 64자 영숫자 refresh 토큰을 생성합니다.
pub fn generate_refresh_token() -> String {
    let mut rng = rand::rng();
    (0..REFRESH_TOKEN_LENGTH)
        .map(|_| char::from(ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())]))
        .collect()
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn is_expired(expires_at: &str) -> Result<bool, AppError> {
    let expires = NaiveDateTime::parse_from_str(expires_at, TIMESTAMP_FORMAT)
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    Ok(expires.and_utc() < Utc::now())
}

/// 요청의 Cookie 헤더(여러 개일 수 있음)에서 이름이 일치하는 값을 찾습니다.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

/// 로그인 시 내려주는 refresh 토큰 Set-Cookie 값
pub fn refresh_cookie(config: &Config, token: &str) -> String {
    format!(
        "{}={}; Max-Age={}{}",
        config.refresh_token_key,
        token,
        config.refresh_token_exp_seconds,
        cookie_attributes(config)
    )
}

/// 로그아웃 시 refresh 토큰 쿠키를 지우는 Set-Cookie 값
pub fn expired_refresh_cookie(config: &Config) -> String {
    format!(
        "{}=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT{}",
        config.refresh_token_key,
        cookie_attributes(config)
    )
}

fn cookie_attributes(config: &Config) -> String {
    let mut attrs = String::from("; Path=/; HttpOnly; SameSite=None");
    if config.secure_cookies {
        attrs.push_str("; Secure");
    }
    if let Some(domain) = &config.site_domain {
        attrs.push_str("; Domain=");
        attrs.push_str(domain);
    }
    attrs
}
