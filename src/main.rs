mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};

use application::auth_service::AuthService;
use application::content_service::ContentService;
use data::comment_repository::SqliteCommentRepository;
use data::post_repository::SqlitePostRepository;
use data::user_repository::SqliteUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::SessionKeys;
use presentation::handlers;
use presentation::middleware::{RequestIdMiddleware, SessionMiddleware, TimingMiddleware};
use presentation::render::PlainRenderer;
use presentation::views::Renderer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let post_repo = Arc::new(SqlitePostRepository::new(pool.clone()));
    let comment_repo = Arc::new(SqliteCommentRepository::new(pool.clone()));

    let auth_service = AuthService::new(
        Arc::clone(&user_repo),
        SessionKeys::new(config.secret_key.clone()),
    );
    let content_service = ContentService::new(Arc::clone(&post_repo), Arc::clone(&comment_repo));
    let renderer: Arc<dyn Renderer> = Arc::new(PlainRenderer);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(content_service.clone()))
            .app_data(web::Data::from(Arc::clone(&renderer)))
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(SessionMiddleware)
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
