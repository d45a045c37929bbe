//! # Google Books API 클라이언트
//!
//! 로컬 DB에 없는 ISBN을 Google Books volumes API에서 찾아옵니다.
//!
//! - 요청: `GET {base_url}/volumes?q=isbn:{isbn}` (타임아웃 10초)
//! - 전송/HTTP/파싱 오류는 로그만 남기고 "찾지 못함"(`None`)으로 처리합니다.

use std::{sync::Arc, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Author, Book, Category};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
enum GoogleBooksError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    language: String,
    #[serde(default)]
    published_date: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Clone)]
pub struct GoogleBooksClient {
    inner: Arc<GoogleBooksClientInner>,
}

struct GoogleBooksClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleBooksClient {
    /// # Errors
    ///
    /// HTTP 클라이언트(TLS 백엔드) 초기화에 실패하면 에러를 반환합니다.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(GoogleBooksClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// ISBN으로 도서를 찾습니다. 결과가 없거나 호출에 실패하면 `None`입니다.
    pub async fn get_book_by_isbn(&self, isbn: &str) -> Option<Book> {
        match self.fetch_volumes(isbn).await {
            Ok(volumes) => parse_book(isbn, volumes),
            Err(e) => {
                tracing::error!(isbn, error = %e, "Error fetching data from Google Books API");
                None
            }
        }
    }

    async fn fetch_volumes(&self, isbn: &str) -> Result<VolumesResponse, GoogleBooksError> {
        let url = format!("{}/volumes", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .query(&[("q", format!("isbn:{isbn}"))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GoogleBooksError::Status(response.status()));
        }

        Ok(response.json::<VolumesResponse>().await?)
    }
}

/// 첫 번째 검색 결과를 `Book`으로 변환합니다. 응답의 ISBN 대신 요청한 ISBN을 그대로 씁니다.
fn parse_book(isbn: &str, volumes: VolumesResponse) -> Option<Book> {
    if volumes.total_items == 0 {
        return None;
    }

    let info = volumes.items.into_iter().next()?.volume_info;
    let title = info.title.filter(|t| !t.trim().is_empty())?;

    Some(Book {
        isbn: isbn.to_string(),
        title,
        language: info.language,
        publication_date: info.published_date,
        authors: info.authors.into_iter().map(|name| Author { name }).collect(),
        categories: info.categories.iter().map(|name| Category::new(name)).collect(),
    })
}
