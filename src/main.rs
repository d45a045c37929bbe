//! # Libris 진입점
//!
//! ```bash
//! libris                 # = libris serve
//! libris serve
//! libris migrate
//! libris create-admin --username admin --email admin@library.example
//! ```
//!
//! 모든 명령은 먼저 `.env`를 읽고 설정과 로깅을 초기화합니다.
//! 명령이 실패하면 에러를 로그로 남기고 종료 코드 1로 끝납니다.

use clap::{Parser, Subcommand};
use libris::{
    commands,
    config::{Config, Environment},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "libris")]
#[command(author, version, about = "Library management API server and admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Create an admin user
    CreateAdmin {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // .env 파일이 없어도 시스템 환경변수만으로 실행할 수 있습니다.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::Production);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.environment);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(config).await?,
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => commands::admin::run(&config, &username, &email, &password).await?,
    }
    Ok(())
}

/// 로그 수집기를 초기화합니다.
///
/// 개발/테스트 환경에서는 사람이 읽기 좋은 형식으로,
/// 배포 환경(STAGING, PRODUCTION)에서는 JSON 한 줄 형식으로 출력합니다.
fn init_tracing(environment: Environment) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "libris=debug,tower_http=debug,axum=debug".into());

    let (plain, json) = if environment.is_deployed() {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}
