//! # 비밀번호 / 이메일 검증과 해싱
//!
//! - `hash_password()` / `verify_password()`: Argon2id 해싱과 검증
//! - `validate_password()`: 길이와 강도 규칙 검사 (위반 시 422)
//! - `validate_email()`: 최소한의 이메일 형식 검사 (위반 시 422)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

const SPECIAL_CHARACTERS: &str = "!@#%^&*";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 숫자, 영문자, 특수문자(`!@#%^&*`)를 각각 하나 이상 포함하고
/// 그 밖의 문자는 쓰지 않은 비밀번호인지 확인합니다.
pub fn is_strong_password(password: &str) -> bool {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SPECIAL_CHARACTERS.contains(c));

    allowed
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| SPECIAL_CHARACTERS.contains(c))
}

pub fn validate_password(password: &str, min_len: usize, max_len: usize) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < min_len || len > max_len {
        return Err(AppError::Unprocessable(format!(
            "Password must be between {} and {} characters",
            min_len, max_len
        )));
    }

    if !is_strong_password(password) {
        return Err(AppError::Unprocessable(
            "Password must contain at least one letter, one digit and one special symbol (!@#%^&*)"
                .to_string(),
        ));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let invalid = || AppError::Unprocessable(format!("Invalid email address: {}", email));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty());

    if local.is_empty() || domain.contains('@') || !domain_ok || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}
