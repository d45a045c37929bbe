//! 데이터베이스 마이그레이션 명령
//!
//! ```bash
//! libris migrate
//! ```

use anyhow::Context;

use crate::{config::Config, db};

pub async fn run(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Connecting to database...");
    let pool = db::connect(config)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    tracing::info!("Migrations complete!");
    pool.close().await;
    Ok(())
}
