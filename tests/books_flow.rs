//! 도서 조회, 검색, 캐시, 이용 불가 카테고리 테스트
//!
//! Google Books API는 httpmock 서버로 대체합니다.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{Auth, TestApp};
use httpmock::prelude::*;
use libris::{
    db::books as db_books,
    models::{Author, Book, Category},
};
use serde_json::json;

fn book(isbn: &str, title: &str, author: &str, categories: &[&str]) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: title.to_string(),
        language: "en".to_string(),
        publication_date: "1965-08-01".to_string(),
        authors: vec![Author {
            name: author.to_string(),
        }],
        categories: categories.iter().map(|name| Category::new(name)).collect(),
    }
}

async fn seed_library(app: &TestApp) {
    for book in [
        book("0441013597", "Dune", "Frank Herbert", &["Fiction", "Science Fiction"]),
        book("0441172717", "Dune Messiah", "Frank Herbert", &["Science Fiction"]),
        book("0553293354", "Foundation", "Isaac Asimov", &["Science Fiction"]),
    ] {
        db_books::create_book(&app.state.pool, &book).await.unwrap();
    }
}

/// 백그라운드 태스크가 끝날 때까지 조건을 다시 확인합니다.
async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not met in time");
}

#[tokio::test]
async fn books_api_requires_access_token() {
    let app = TestApp::new().await;

    let response = app.get("/books/categories", Auth::None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.error_message(),
        "Access token is required in the Authorization header."
    );

    let response = app.get("/books/categories", Auth::Bearer("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "Invalid token.");

    // refresh 토큰 쿠키로는 도서 API를 쓸 수 없습니다.
    let (_, cookie) = app.user_session("alice").await;
    let response = app.get("/books/categories", Auth::Cookie(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bearer_scheme_is_matched_case_insensitively() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let token = app.reader_token().await;

    let lower = format!("bearer {token}");
    let response = app
        .get("/books/by-isbn/0441013597", Auth::Header(&lower))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .get("/books/by-isbn/0441013597", Auth::Header("Basic dXNlcjpwYXNz"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.error_message(),
        "Access token is required in the Authorization header."
    );
}

#[tokio::test]
async fn isbn_must_be_ten_digits() {
    let app = TestApp::new().await;
    let token = app.reader_token().await;

    for isbn in ["12345", "044101359X", "04410135970"] {
        let response = app
            .get(&format!("/books/by-isbn/{isbn}"), Auth::Bearer(&token))
            .await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error_message(), "ISBN must be a 10-digit number");
    }
}

#[tokio::test]
async fn book_by_isbn_from_database() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let token = app.reader_token().await;

    let response = app.get("/books/by-isbn/0441013597", Auth::Bearer(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "isbn": "0441013597",
            "title": "Dune",
            "language": "en",
            "publication_date": "1965-08-01",
            "authors": [{ "name": "Frank Herbert" }],
            "categories": [{ "name": "fiction" }, { "name": "science fiction" }]
        })
    );
}

#[tokio::test]
async fn unknown_isbn_is_fetched_from_google_books_then_cached_and_saved() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/volumes")
                .query_param("q", "isbn:0141439513");
            then.status(200).json_body(json!({
                "totalItems": 1,
                "items": [{ "volumeInfo": {
                    "title": "Pride and Prejudice",
                    "language": "en",
                    "publishedDate": "2002-12-31",
                    "authors": ["Jane Austen"],
                    "categories": ["Fiction"]
                }}]
            }));
        })
        .await;

    let app = TestApp::with_google_books(&server.base_url()).await;
    let token = app.reader_token().await;

    let response = app.get("/books/by-isbn/0141439513", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Pride and Prejudice");
    assert_eq!(response.body["categories"], json!([{ "name": "fiction" }]));

    let pool = app.state.pool.clone();
    eventually(|| {
        let pool = pool.clone();
        async move {
            db_books::find_book_by_isbn(&pool, "0141439513")
                .await
                .unwrap()
                .is_some()
        }
    })
    .await;

    let cache = app.state.cache.clone();
    eventually(|| {
        let cache = cache.clone();
        async move { cache.get("book:0141439513").await.is_some() }
    })
    .await;

    let response = app.get("/books/by-isbn/0141439513", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authors"], json!([{ "name": "Jane Austen" }]));

    mock.assert_hits_async(1).await;

    // 캐시가 비어도 이제는 DB에서 찾습니다.
    app.state.cache.clear().await;
    let response = app.get("/books/by-isbn/0141439513", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn isbn_unknown_everywhere_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/volumes");
            then.status(200).json_body(json!({ "kind": "books#volumes", "totalItems": 0 }));
        })
        .await;

    let app = TestApp::with_google_books(&server.base_url()).await;
    let token = app.reader_token().await;

    let response = app.get("/books/by-isbn/0000000000", Auth::Bearer(&token)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "Book(s) not found.");
}

#[tokio::test]
async fn books_by_category_ignores_case() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let token = app.reader_token().await;

    let response = app
        .get("/books/by-category/Science%20Fiction", Auth::Bearer(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let titles: Vec<&str> = response.body["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune", "Dune Messiah", "Foundation"]);

    let response = app.get("/books/by-category/poetry", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "Book(s) not found.");
}

#[tokio::test]
async fn categories_by_id_and_listing() {
    let app = TestApp::new().await;
    let token = app.reader_token().await;

    let response = app.get("/books/categories", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "Category(s) not found.");

    seed_library(&app).await;

    let response = app.get("/books/categories", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "categories": [
            { "id": 1, "name": "fiction" },
            { "id": 2, "name": "science fiction" }
        ]})
    );

    let response = app.get("/books/category/2", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "id": 2, "name": "science fiction" }));

    let response = app.get("/books/category/42", Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "Category(s) not found.");
}

#[tokio::test]
async fn category_listing_is_served_from_cache() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let token = app.reader_token().await;

    let first = app.get("/books/categories", Auth::Bearer(&token)).await;
    assert_eq!(first.status, StatusCode::OK);

    let cache = app.state.cache.clone();
    eventually(|| {
        let cache = cache.clone();
        async move { cache.get("categories").await.is_some() }
    })
    .await;

    db_books::create_book(&app.state.pool, &book("0345391802", "Hitchhiker", "Douglas Adams", &["Comedy"]))
        .await
        .unwrap();

    let second = app.get("/books/categories", Auth::Bearer(&token)).await;
    assert_eq!(second.body, first.body);
}

#[tokio::test]
async fn search_matches_all_given_fields() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let token = app.reader_token().await;

    let response = app
        .post_json("/books/search", json!({ "author": "Frank Herbert" }), Auth::Bearer(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["books"].as_array().unwrap().len(), 2);

    let response = app
        .post_json(
            "/books/search",
            json!({ "author": "Frank Herbert", "title": "Dune Messiah" }),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["books"][0]["isbn"], "0441172717");
    assert_eq!(response.body["books"].as_array().unwrap().len(), 1);

    let response = app
        .post_json(
            "/books/search",
            json!({ "author": "Isaac Asimov", "title": "Dune" }),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "Book(s) not found.");
}

#[tokio::test]
async fn empty_search_is_rejected() {
    let app = TestApp::new().await;
    let token = app.reader_token().await;

    for body in [json!({}), json!({ "title": "", "author": "  " })] {
        let response = app.post_json("/books/search", body, Auth::Bearer(&token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_message(), "Search query cannot be empty.");
    }
}

#[tokio::test]
async fn admin_manages_unavailable_categories() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let admin = app.admin_session("root").await;
    let (id, _) = app.user_session("alice").await;
    let base = format!("/books/unavailable_categories/user/{id}");

    let response = app.get(&base, Auth::Cookie(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "user_id": id, "unavailable_categories": [] })
    );

    // 존재하지 않는 카테고리(99)는 무시하고, 같은 카테고리를 두 번 추가해도 한 번만 들어갑니다.
    for _ in 0..2 {
        let response = app
            .post_json(
                &format!("{base}/add"),
                json!({ "user_id": id, "categories_id": [2, 1, 99] }),
                Auth::Cookie(&admin),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body["unavailable_categories"],
            json!([{ "id": 1, "name": "fiction" }, { "id": 2, "name": "science fiction" }])
        );
    }

    let response = app
        .post_json(
            &format!("{base}/remove"),
            json!({ "categories_id": [1] }),
            Auth::Cookie(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["unavailable_categories"],
        json!([{ "id": 2, "name": "science fiction" }])
    );
}

#[tokio::test]
async fn unavailable_categories_validate_user() {
    let app = TestApp::new().await;
    seed_library(&app).await;
    let admin = app.admin_session("root").await;
    let (id, cookie) = app.user_session("alice").await;

    let response = app
        .post_json(
            &format!("/books/unavailable_categories/user/{id}/add"),
            json!({ "user_id": id + 1, "categories_id": [1] }),
            Auth::Cookie(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .get("/books/unavailable_categories/user/999", Auth::Cookie(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "User not found.");

    let response = app
        .get(&format!("/books/unavailable_categories/user/{id}"), Auth::Cookie(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
