//! # Yatube Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use yatube_core::ports::TokenService;
use yatube_infra::JwtTokenService;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;
mod templates;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!("Starting Yatube on {}:{}", config.host, config.port);

    // Build application state
    let state = web::Data::new(AppState::new(&config).await);
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let token_service = web::Data::new(token_service);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(token_service.clone())
            .configure(handlers::configure_routes)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
