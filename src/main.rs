use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::other(e.to_string())
    })?;

    let db_pool = web::Data::new(state.db_pool);
    let claim_service = web::Data::from(state.claim_service);
    let study_service = web::Data::from(state.study_service);
    let summary_service = web::Data::from(state.summary_service);

    tracing::info!("Starting Hypertrophy Research Explorer on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(claim_service.clone())
            .app_data(study_service.clone())
            .app_data(summary_service.clone())
            .configure(api::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
