//! HTTP 서버 실행 명령 (기본 명령)
//!
//! 1. SQLite 연결 풀 생성
//! 2. 데이터베이스 마이그레이션 실행
//! 3. 캐시와 Google Books 클라이언트 준비
//! 4. 라우터 구성 후 Ctrl+C를 받을 때까지 요청 처리

use std::sync::Arc;

use anyhow::Context;

use crate::{
    config::Config,
    db,
    routes::{build_router, AppState},
    services::{CacheStore, GoogleBooksClient},
};

pub async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        environment = ?config.environment,
        "Starting Libris server on {}:{}",
        config.host,
        config.port
    );

    let pool = db::connect(&config)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    let google_books = GoogleBooksClient::new(&config.google_books_api)
        .context("failed to build the Google Books client")?;

    let state = AppState {
        pool: pool.clone(),
        cache: CacheStore::new(config.cache_max_capacity),
        google_books,
        config: Arc::new(config),
    };

    let addr = format!("{}:{}", state.config.host, state.config.port);
    let prefix = state.config.api_prefix();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server listening on {}{}", addr, prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
