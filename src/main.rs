mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::UserStore;

/// Single frontend origin, credentials allowed.
fn cors_policy(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting User Service...");
    log::info!("📁 Users file: {}", config.users_file.display());

    let store = UserStore::new(config.users_file.clone(), config.users_file_lock);
    if store.serializes_writes() {
        log::info!("🔐 Mutations serialized behind a write lock");
    } else {
        log::warn!("⚠️  Mutations are not serialized: concurrent writes are last-writer-wins");
    }
    if !store.path().exists() {
        log::warn!("⚠️  {} does not exist; every users request fails until it is created", store.path().display());
    }
    let store_data = web::Data::new(store);

    let bind_addr = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    HttpServer::new(move || {
        let cors = cors_policy(&config.frontend_origin);
        let openapi = api::swagger::openapi(config.public_api_url.as_deref());

        App::new()
            .app_data(store_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .route("/health", web::get().to(api::health::health_check))
            .configure(api::configure(config.api_token.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await
}
