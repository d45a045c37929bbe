use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_USAGE: &str = "Use the access_token in the 'Authorization' header \
in the format 'Bearer <token>' to access the API functions";

/// `POST /auth/login` 폼 본문 (application/x-www-form-urlencoded)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub detail: String,
}

impl AccessTokenResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            detail: ACCESS_TOKEN_USAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn login() -> Self {
        Self {
            detail: "Login successful".to_string(),
        }
    }

    pub fn logout() -> Self {
        Self {
            detail: "Logout successful".to_string(),
        }
    }
}

/// DB의 `refresh_tokens` 테이블 한 행 (토큰 원문은 저장하지 않고 해시만 저장)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: String,
    pub user_id: i64,
    pub expires_at: String,
}
