//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다. (`.env.example` 참고)
//!
//! 필수 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키
//!
//! 나머지 항목은 모두 기본값이 있습니다. 값이 있지만 형식이 잘못된 경우
//! (예: `PORT=abc`) 기본값으로 조용히 대체하지 않고 `ConfigError`를 반환합니다.

use std::{env, str::FromStr};

use jsonwebtoken::Algorithm;
use regex::Regex;
use thiserror::Error;

/// 액세스 토큰 유효 시간 상한 (1년, 분 단위)
const MAX_JWT_EXP_MINUTES: i64 = 60 * 24 * 365;
/// refresh 토큰 유효 시간 상한 (1년, 초 단위)
const MAX_REFRESH_TOKEN_EXP_SECONDS: i64 = 60 * 60 * 24 * 365;

/// 설정 로딩 중 발생할 수 있는 에러
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// 애플리케이션 실행 환경
///
/// `ENVIRONMENT` 환경변수 값(대문자)과 1:1로 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Staging,
    Testing,
    Production,
}

impl Environment {
    /// 디버그용 환경인지 확인합니다. (LOCAL, STAGING, TESTING)
    pub fn is_debug(self) -> bool {
        matches!(self, Self::Local | Self::Staging | Self::Testing)
    }

    /// 실제로 배포된 환경인지 확인합니다. (STAGING, PRODUCTION)
    pub fn is_deployed(self) -> bool {
        matches!(self, Self::Staging | Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCAL" => Ok(Self::Local),
            "STAGING" => Ok(Self::Staging),
            "TESTING" => Ok(Self::Testing),
            "PRODUCTION" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `Arc<Config>`로
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// SQLite 데이터베이스 URL (예: "sqlite:data/libris.db?mode=rwc")
    pub database_url: String,
    /// 연결 풀의 최대 연결 수
    pub db_max_connections: u32,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    pub port: u16,
    /// refresh 토큰 쿠키의 Domain 속성. 없으면 Domain 없이 설정합니다.
    pub site_domain: Option<String>,
    /// 배포 환경에서 API가 마운트되는 경로 `/v{app_version}`
    pub app_version: String,
    pub cors_origins: Vec<String>,
    /// 목록 외에 추가로 허용할 출처(origin) 패턴. 출처 전체가 일치해야 합니다.
    pub cors_origins_regex: Option<Regex>,
    pub cors_headers: Vec<String>,
    pub min_password_length: usize,
    pub max_password_length: usize,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// HMAC 계열(HS256/HS384/HS512)만 허용됩니다.
    pub jwt_algorithm: Algorithm,
    /// 액세스 토큰 유효 시간 (분)
    pub jwt_exp_minutes: i64,
    /// refresh 토큰 쿠키 이름
    pub refresh_token_key: String,
    /// refresh 토큰 유효 시간 (초)
    pub refresh_token_exp_seconds: i64,
    pub secure_cookies: bool,
    /// Google Books API 기본 URL
    pub google_books_api: String,
    /// 캐시에 보관할 최대 항목 수
    pub cache_max_capacity: u64,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`이 없거나, 값의 형식이 잘못되면 에러를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 읽습니다.
    ///
    /// 테스트에서 프로세스 환경변수를 건드리지 않고 설정을 만들 때 사용합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let jwt_algorithm: Algorithm = parse_or(&lookup, "JWT_ALG", Algorithm::HS256)?;
        if !matches!(
            jwt_algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Invalid {
                key: "JWT_ALG",
                value: format!("{jwt_algorithm:?}"),
            });
        }

        let min_password_length: usize = parse_or(&lookup, "MIN_PASSWORD_LENGTH", 6)?;
        let max_password_length: usize = parse_or(&lookup, "MAX_PASSWORD_LENGTH", 128)?;
        if min_password_length > max_password_length {
            return Err(ConfigError::Invalid {
                key: "MIN_PASSWORD_LENGTH",
                value: format!(
                    "{min_password_length} (greater than MAX_PASSWORD_LENGTH {max_password_length})"
                ),
            });
        }

        Ok(Self {
            environment: parse_or(&lookup, "ENVIRONMENT", Environment::Production)?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            site_domain: lookup("SITE_DOMAIN").filter(|d| !d.is_empty()),
            app_version: lookup("APP_VERSION").unwrap_or_else(|| "1".to_string()),
            cors_origins: split_list(lookup("CORS_ORIGINS").as_deref().unwrap_or("")),
            cors_origins_regex: parse_regex(&lookup, "CORS_ORIGINS_REGEX")?,
            cors_headers: split_list(
                lookup("CORS_HEADERS")
                    .as_deref()
                    .unwrap_or("authorization,content-type"),
            ),
            min_password_length,
            max_password_length,
            jwt_secret: required("JWT_SECRET")?,
            jwt_algorithm,
            jwt_exp_minutes: parse_lifetime(&lookup, "JWT_EXP", 10, MAX_JWT_EXP_MINUTES)?,
            refresh_token_key: lookup("REFRESH_TOKEN_KEY")
                .unwrap_or_else(|| "refreshToken".to_string()),
            refresh_token_exp_seconds: parse_lifetime(
                &lookup,
                "REFRESH_TOKEN_EXP",
                60 * 60 * 24 * 21,
                MAX_REFRESH_TOKEN_EXP_SECONDS,
            )?,
            secure_cookies: parse_or(&lookup, "SECURE_COOKIES", true)?,
            google_books_api: lookup("GOOGLE_BOOKS_API")
                .unwrap_or_else(|| "https://www.googleapis.com/books/v1".to_string()),
            cache_max_capacity: parse_or(&lookup, "CACHE_MAX_CAPACITY", 10_000)?,
        })
    }

    /// API 라우트가 마운트될 경로 접두사
    ///
    /// 배포 환경에서는 `/v1`처럼 버전 접두사가 붙고, 그 외에는 빈 문자열입니다.
    pub fn api_prefix(&self) -> String {
        if self.environment.is_deployed() {
            format!("/v{}", self.app_version)
        } else {
            String::new()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// 토큰 유효 시간은 1 이상 `max` 이하만 허용합니다.
fn parse_lifetime<F>(lookup: &F, key: &'static str, default: i64, max: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: i64 = parse_or(lookup, key, default)?;
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

/// 패턴을 `^(?:...)$`로 감싸 부분 일치를 막습니다.
fn parse_regex<F>(lookup: &F, key: &'static str) -> Result<Option<Regex>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|raw| !raw.trim().is_empty()) {
        None => Ok(None),
        Some(raw) => Regex::new(&format!("^(?:{})$", raw.trim()))
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
