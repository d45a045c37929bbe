//! # 도서 데이터베이스 쿼리 모듈
//!
//! ## 테이블 구조
//! - `books`: 도서 (isbn은 UNIQUE)
//! - `authors`, `categories`: 이름이 UNIQUE인 엔티티
//! - `book_authors`, `book_categories`: 다대다(N:M) 관계 테이블
//!
//! 조회 함수는 `BookRow`를 읽은 뒤 저자/카테고리를 채워 `Book`으로 돌려줍니다.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::*;

pub async fn find_book_by_isbn(pool: &SqlitePool, isbn: &str) -> Result<Option<Book>, AppError> {
    let row = sqlx::query_as::<_, BookRow>(
        "SELECT id, isbn, title, language, publication_date FROM books WHERE isbn = ?",
    )
    .bind(isbn)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(hydrate(pool, row).await?)),
        None => Ok(None),
    }
}

/// 카테고리 이름(소문자 비교)으로 도서 목록을 조회합니다.
pub async fn list_books_by_category(
    pool: &SqlitePool,
    category: &str,
) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query_as::<_, BookRow>(
        r#"
        SELECT b.id, b.isbn, b.title, b.language, b.publication_date
        FROM books b
        JOIN book_categories bc ON bc.book_id = b.id
        JOIN categories c ON c.id = bc.category_id
        WHERE c.name = ?
        ORDER BY b.id
        "#,
    )
    .bind(category.to_lowercase())
    .fetch_all(pool)
    .await?;

    hydrate_all(pool, rows).await
}

/// 검색 조건에 들어 있는 필드만 WHERE 절에 AND로 추가합니다.
pub async fn search_books(
    pool: &SqlitePool,
    search: &BookSearchRequest,
) -> Result<Vec<Book>, AppError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT b.id, b.isbn, b.title, b.language, b.publication_date FROM books b WHERE 1 = 1",
    );

    if let Some(title) = &search.title {
        query.push(" AND b.title = ").push_bind(title);
    }
    if let Some(author) = &search.author {
        query
            .push(
                " AND EXISTS (SELECT 1 FROM book_authors ba JOIN authors a ON a.id = ba.author_id \
                 WHERE ba.book_id = b.id AND a.name = ",
            )
            .push_bind(author)
            .push(")");
    }
    if let Some(publication_date) = &search.publication_date {
        query
            .push(" AND b.publication_date = ")
            .push_bind(publication_date);
    }
    if let Some(isbn) = &search.isbn {
        query.push(" AND b.isbn = ").push_bind(isbn);
    }
    query.push(" ORDER BY b.id");

    let rows = query.build_query_as::<BookRow>().fetch_all(pool).await?;

    hydrate_all(pool, rows).await
}

/// 도서를 저자/카테고리와 함께 한 트랜잭션으로 저장합니다.
///
/// 같은 ISBN이 이미 있으면 아무것도 바꾸지 않고 기존 ID를 반환합니다.
/// 저자와 카테고리는 이름으로 찾아 재사용하고, 없을 때만 새로 만듭니다.
pub async fn create_book(pool: &SqlitePool, book: &Book) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO books (isbn, title, language, publication_date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.language)
    .bind(&book.publication_date)
    .execute(&mut *tx)
    .await?;

    let book_id = sqlx::query_scalar::<_, i64>("SELECT id FROM books WHERE isbn = ?")
        .bind(&book.isbn)
        .fetch_one(&mut *tx)
        .await?;

    if inserted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(book_id);
    }

    for author in &book.authors {
        let author_id = get_or_create_named(&mut *tx, "authors", &author.name).await?;
        sqlx::query("INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?, ?)")
            .bind(book_id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;
    }

    for category in &book.categories {
        let category_id =
            get_or_create_named(&mut *tx, "categories", &category.name.to_lowercase()).await?;
        sqlx::query("INSERT OR IGNORE INTO book_categories (book_id, category_id) VALUES (?, ?)")
            .bind(book_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(book_id)
}

/// `authors` / `categories`처럼 `(id, name UNIQUE)` 형태인 테이블에서 이름으로 행을 찾거나 만듭니다.
async fn get_or_create_named(
    conn: &mut SqliteConnection,
    table: &'static str,
    name: &str,
) -> Result<i64, AppError> {
    sqlx::query(&format!("INSERT OR IGNORE INTO {table} (name) VALUES (?)"))
        .bind(name)
        .execute(&mut *conn)
        .await?;

    let id = sqlx::query_scalar::<_, i64>(&format!("SELECT id FROM {table} WHERE name = ?"))
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(id)
}

async fn hydrate_all(pool: &SqlitePool, rows: Vec<BookRow>) -> Result<Vec<Book>, AppError> {
    let mut books = Vec::with_capacity(rows.len());
    for row in rows {
        books.push(hydrate(pool, row).await?);
    }
    Ok(books)
}

async fn hydrate(pool: &SqlitePool, row: BookRow) -> Result<Book, AppError> {
    let authors = sqlx::query_scalar::<_, String>(
        r#"
        SELECT a.name
        FROM authors a
        JOIN book_authors ba ON ba.author_id = a.id
        WHERE ba.book_id = ?
        ORDER BY a.id
        "#,
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    let categories = sqlx::query_scalar::<_, String>(
        r#"
        SELECT c.name
        FROM categories c
        JOIN book_categories bc ON bc.category_id = c.id
        WHERE bc.book_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(row.id)
    .fetch_all(pool)
    .await?;

    Ok(Book {
        isbn: row.isbn,
        title: row.title,
        language: row.language,
        publication_date: row.publication_date,
        authors: authors.into_iter().map(|name| Author { name }).collect(),
        categories: categories.iter().map(|name| Category::new(name)).collect(),
    })
}
