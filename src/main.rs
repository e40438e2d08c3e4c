//! Newsdesk - a small news-publishing website

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk::{
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCaptchaRepository, SqlxCategoryRepository, SqlxNewsRepository,
            SqlxSessionRepository, SqlxUserRepository,
        },
    },
    services::{CaptchaService, NewsService, SmtpMailer, UserService},
    web::{self, templates::Templates, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsdesk=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Newsdesk...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let news_repo = SqlxNewsRepository::boxed(pool.clone());
    let captcha_repo = SqlxCaptchaRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, session_repo));
    let news_service = Arc::new(NewsService::new(news_repo, category_repo));
    let captcha = Arc::new(CaptchaService::new(captcha_repo));
    let mailer = Arc::new(SmtpMailer::new(config.smtp.clone()));

    // Template engine
    let templates = Arc::new(Templates::new()?);

    // Build application state
    let state = AppState {
        user_service,
        news_service,
        captcha,
        mailer,
        templates,
    };

    // Build router
    let app = web::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
