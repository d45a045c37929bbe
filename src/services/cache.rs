//! # 캐시 저장소
//!
//! `moka` 인메모리 캐시를 감싼 키/값 저장소입니다.
//! 값은 JSON 문자열로 보관하고, 항목마다 TTL(유효 시간)을 따로 지정할 수 있습니다.
//!
//! ## 키 규칙
//! - `book:{isbn}`: ISBN으로 조회한 도서
//! - `books:category:{name}`: 카테고리별 도서 목록
//! - `books:search:{query}`: 검색 결과
//! - `category:{id}`: 카테고리 하나
//! - `categories`: 전체 카테고리 목록

use std::time::{Duration, Instant};

use moka::{future::Cache, Expiry};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    ttl: Option<Duration>,
}

/// 항목에 저장된 TTL을 그대로 만료 시간으로 사용하는 정책
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    // 같은 키에 다시 쓰면 새 값의 TTL로 갱신
    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// 애플리케이션 전체에서 공유하는 캐시 핸들
///
/// 내부 `Cache`가 Arc 기반이라 clone해도 같은 저장소를 가리킵니다.
#[derive(Clone)]
pub struct CacheStore {
    cache: Cache<String, CacheEntry>,
}

impl CacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { cache }
    }

    /// 값을 저장합니다. `ttl`이 `None`이면 용량 초과로 밀려날 때까지 유지됩니다.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Option<Duration>) {
        let entry = CacheEntry {
            value: value.into(),
            ttl,
        };
        self.cache.insert(key.into(), entry).await;
    }

    /// 값을 JSON으로 직렬화해 저장합니다.
    pub async fn set_json<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), serde_json::Error> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw, ttl).await;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    /// 저장된 JSON을 역직렬화합니다. 형식이 맞지 않는 항목은 지우고 `None`을 반환합니다.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding malformed cache entry");
                self.delete(key).await;
                None
            }
        }
    }

    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

/// 캐시 쓰기를 응답과 분리해 백그라운드 태스크로 실행합니다.
///
/// 직렬화는 호출한 쪽에서 끝내고, 태스크에는 JSON 문자열만 넘깁니다.
pub fn spawn_set_json<T: Serialize>(cache: &CacheStore, key: String, value: &T, ttl: Duration) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(key = %key, error = %e, "failed to serialize cache entry");
            return;
        }
    };

    let cache = cache.clone();
    tokio::spawn(async move {
        cache.set(key, raw, Some(ttl)).await;
    });
}
