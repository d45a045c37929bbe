//! # 사용자 / 도서관 회원 모델 정의
//!
//! - `User`: DB의 `users` 테이블 한 행
//! - `UserRole`: 관리자(admin) / 일반 사용자(user)
//! - `MembershipStatus`, `LibraryMember`: 도서관 회원 자격
//! - 요청/응답 구조체들

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum MembershipStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LibraryMember {
    pub user_id: i64,
    pub contact_information: String,
    pub membership_status: MembershipStatus,
    pub membership_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// `POST /auth/register` 요청 본문
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /users/create` 요청 본문 (관리자 전용). role이 없으면 일반 사용자입니다.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// 계정 생성에 필요한 입력. 회원가입, 관리자 API, CLI가 모두 이 형태로 모입니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            role: UserRole::User,
        }
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeMembershipRequest {
    pub user_id: i64,
    pub contact_information: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeMembershipResponse {
    pub user_id: i64,
    pub current_membership_status: MembershipStatus,
}
