//! # 도서 / 저자 / 카테고리 모델 정의
//!
//! API 응답과 캐시 값은 모두 이 모듈의 구조체를 JSON으로 직렬화한 것입니다.
//! 카테고리 이름은 항상 소문자로 정규화됩니다.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "lowercase")]
    pub name: String,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryResponse {
    pub id: i64,
    #[serde(deserialize_with = "lowercase")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub language: String,
    pub publication_date: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Books {
    pub books: Vec<Book>,
}

/// DB의 `books` 테이블 한 행. 저자/카테고리는 별도 쿼리로 채웁니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub language: String,
    pub publication_date: String,
}

/// `POST /books/search` 요청 본문
///
/// 주어진 필드는 모두 정확히 일치해야 합니다(AND). 빈 문자열은 없는 값으로 취급합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSearchRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_date: Option<String>,
    pub isbn: Option<String>,
}

impl BookSearchRequest {
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            title: clean(self.title),
            author: clean(self.author),
            publication_date: clean(self.publication_date),
            isbn: clean(self.isbn),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publication_date.is_none()
            && self.isbn.is_none()
    }

    pub fn cache_key(&self) -> String {
        // 필드 순서가 고정된 구조체라 직렬화 결과가 안정적입니다.
        let query = serde_json::to_string(self).unwrap_or_default();
        format!("books:search:{query}")
    }
}

#[derive(Debug, Deserialize)]
pub struct UnavailableCategoriesChangeRequest {
    pub user_id: Option<i64>,
    pub categories_id: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserUnavailableCategoriesResponse {
    pub user_id: i64,
    pub unavailable_categories: Vec<CategoryResponse>,
}

fn lowercase<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(name.to_lowercase())
}
