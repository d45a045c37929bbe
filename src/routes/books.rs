//! # 도서 / 카테고리 핸들러
//!
//! ## 엔드포인트 (액세스 토큰 필요)
//! - `GET  /books/by-isbn/{isbn}` → 캐시 → DB → Google Books 순으로 조회
//! - `GET  /books/by-category/{category_name}` → 카테고리별 도서 목록
//! - `GET  /books/category/{category_id}` → 카테고리 하나
//! - `GET  /books/categories` → 전체 카테고리
//! - `POST /books/search` → 조건 검색 (모든 조건 AND)
//!
//! ## 엔드포인트 (관리자 전용, refresh 토큰 쿠키)
//! - `GET  /books/unavailable_categories/user/{user_id}`
//! - `POST /books/unavailable_categories/user/{user_id}/add`
//! - `POST /books/unavailable_categories/user/{user_id}/remove`
//!
//! 조회 결과는 응답을 돌려준 뒤 백그라운드 태스크에서 캐시에 기록합니다.

use std::time::Duration;

use axum::extract::{Path, State};

use crate::{
    db::{books as db_books, categories as db_categories, users as db_users},
    error::{messages, AppError},
    middleware::auth::{AdminUser, AuthUser},
    models::*,
    routes::{extract::Json, AppState},
    services::cache::spawn_set_json,
};

const BOOK_TTL: Duration = Duration::from_secs(3600);
const BOOKS_BY_CATEGORY_TTL: Duration = Duration::from_secs(600);
const CATEGORY_TTL: Duration = Duration::from_secs(3600);
const CATEGORIES_TTL: Duration = Duration::from_secs(600);
const SEARCH_TTL: Duration = Duration::from_secs(1200);

/// 앞뒤 공백을 제거한 값이 정확히 10자리 숫자인지 확인합니다.
pub fn validate_isbn(isbn: &str) -> Result<&str, AppError> {
    let isbn = isbn.trim();
    if isbn.len() == 10 && isbn.bytes().all(|b| b.is_ascii_digit()) {
        Ok(isbn)
    } else {
        Err(AppError::Unprocessable(messages::ISBN_NOT_VALID.to_string()))
    }
}

pub async fn get_book_by_isbn(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, AppError> {
    let isbn = validate_isbn(&isbn)?;
    let cache_key = format!("book:{isbn}");

    if let Some(book) = state.cache.get_json::<Book>(&cache_key).await {
        tracing::debug!(isbn, "cache hit for book");
        return Ok(Json(book));
    }

    let book = match db_books::find_book_by_isbn(&state.pool, isbn).await? {
        Some(book) => book,
        None => {
            let book = state
                .google_books
                .get_book_by_isbn(isbn)
                .await
                .ok_or_else(|| AppError::not_found(messages::BOOK_NOT_FOUND))?;
            spawn_persist_book(&state, book.clone());
            book
        }
    };

    spawn_set_json(&state.cache, cache_key, &book, BOOK_TTL);

    Ok(Json(book))
}

pub async fn get_books_by_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(category_name): Path<String>,
) -> Result<Json<Books>, AppError> {
    let category_name = category_name.to_lowercase();
    let cache_key = format!("books:category:{category_name}");

    if let Some(books) = state.cache.get_json::<Books>(&cache_key).await {
        return Ok(Json(books));
    }

    let books = db_books::list_books_by_category(&state.pool, &category_name).await?;
    if books.is_empty() {
        return Err(AppError::not_found(messages::BOOK_NOT_FOUND));
    }

    let books = Books { books };
    spawn_set_json(&state.cache, cache_key, &books, BOOKS_BY_CATEGORY_TTL);

    Ok(Json(books))
}

pub async fn get_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryResponse>, AppError> {
    let cache_key = format!("category:{category_id}");

    if let Some(category) = state.cache.get_json::<CategoryResponse>(&cache_key).await {
        return Ok(Json(category));
    }

    let category = db_categories::get_category(&state.pool, category_id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::CATEGORY_NOT_FOUND))?;

    spawn_set_json(&state.cache, cache_key, &category, CATEGORY_TTL);

    Ok(Json(category))
}

pub async fn get_categories(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<CategoriesResponse>, AppError> {
    if let Some(categories) = state.cache.get_json::<CategoriesResponse>("categories").await {
        return Ok(Json(categories));
    }

    let categories = db_categories::list_categories(&state.pool).await?;
    if categories.is_empty() {
        return Err(AppError::not_found(messages::CATEGORY_NOT_FOUND));
    }

    let categories = CategoriesResponse { categories };
    spawn_set_json(
        &state.cache,
        "categories".to_string(),
        &categories,
        CATEGORIES_TTL,
    );

    Ok(Json(categories))
}

pub async fn search_books(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(search): Json<BookSearchRequest>,
) -> Result<Json<Books>, AppError> {
    let search = search.normalized();
    if search.is_empty() {
        return Err(AppError::bad_request(messages::SEARCH_QUERY_EMPTY));
    }
    let cache_key = search.cache_key();

    if let Some(books) = state.cache.get_json::<Books>(&cache_key).await {
        return Ok(Json(books));
    }

    let books = db_books::search_books(&state.pool, &search).await?;
    if books.is_empty() {
        return Err(AppError::not_found(messages::BOOK_NOT_FOUND));
    }

    let books = Books { books };
    spawn_set_json(&state.cache, cache_key, &books, SEARCH_TTL);

    Ok(Json(books))
}

pub async fn get_unavailable_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserUnavailableCategoriesResponse>, AppError> {
    ensure_user_exists(&state, user_id).await?;

    unavailable_categories_response(&state, user_id).await
}

pub async fn add_unavailable_categories(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UnavailableCategoriesChangeRequest>,
) -> Result<Json<UserUnavailableCategoriesResponse>, AppError> {
    check_body_user_id(user_id, &req)?;
    ensure_user_exists(&state, user_id).await?;

    db_categories::add_unavailable_categories(&state.pool, user_id, &req.categories_id).await?;
    tracing::info!(
        admin_id = admin.user.id,
        user_id,
        categories = ?req.categories_id,
        "unavailable categories added"
    );

    unavailable_categories_response(&state, user_id).await
}

pub async fn remove_unavailable_categories(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UnavailableCategoriesChangeRequest>,
) -> Result<Json<UserUnavailableCategoriesResponse>, AppError> {
    check_body_user_id(user_id, &req)?;
    ensure_user_exists(&state, user_id).await?;

    db_categories::remove_unavailable_categories(&state.pool, user_id, &req.categories_id)
        .await?;
    tracing::info!(
        admin_id = admin.user.id,
        user_id,
        categories = ?req.categories_id,
        "unavailable categories removed"
    );

    unavailable_categories_response(&state, user_id).await
}

/// Google Books에서 가져온 도서를 응답과 별개로 DB에 저장합니다.
fn spawn_persist_book(state: &AppState, book: Book) {
    let pool = state.pool.clone();
    tokio::spawn(async move {
        match db_books::create_book(&pool, &book).await {
            Ok(book_id) => tracing::info!(book_id, isbn = %book.isbn, "book saved from Google Books"),
            Err(e) => tracing::error!(isbn = %book.isbn, error = %e, "failed to save book"),
        }
    });
}

fn check_body_user_id(
    user_id: i64,
    req: &UnavailableCategoriesChangeRequest,
) -> Result<(), AppError> {
    match req.user_id {
        Some(body_id) if body_id != user_id => Err(AppError::BadRequest(format!(
            "user_id in body ({body_id}) does not match user_id in path ({user_id})"
        ))),
        _ => Ok(()),
    }
}

async fn ensure_user_exists(state: &AppState, user_id: i64) -> Result<(), AppError> {
    db_users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;
    Ok(())
}

async fn unavailable_categories_response(
    state: &AppState,
    user_id: i64,
) -> Result<Json<UserUnavailableCategoriesResponse>, AppError> {
    let unavailable_categories =
        db_categories::list_unavailable_categories(&state.pool, user_id).await?;

    Ok(Json(UserUnavailableCategoriesResponse {
        user_id,
        unavailable_categories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn_must_be_ten_digits() {
        assert_eq!(validate_isbn("0441013597").unwrap(), "0441013597");
        assert_eq!(validate_isbn(" 0441013597 ").unwrap(), "0441013597");

        for bad in ["044101359", "04410135978", "044101359X", "", "0441-13597"] {
            assert!(
                matches!(validate_isbn(bad), Err(AppError::Unprocessable(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn body_user_id_must_match_path() {
        let matching = UnavailableCategoriesChangeRequest {
            user_id: Some(3),
            categories_id: vec![1],
        };
        let absent = UnavailableCategoriesChangeRequest {
            user_id: None,
            categories_id: vec![1],
        };
        let other = UnavailableCategoriesChangeRequest {
            user_id: Some(4),
            categories_id: vec![1],
        };

        assert!(check_body_user_id(3, &matching).is_ok());
        assert!(check_body_user_id(3, &absent).is_ok());
        assert!(matches!(check_body_user_id(3, &other), Err(AppError::BadRequest(_))));
    }
}
