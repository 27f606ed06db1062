//! Article recommendation service
//!
//! Port: 8082

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use article_reco_core::{init_logging, load_dotenv, ConfigLoader, LogConfig, ServiceConfig};
use article_reco_engine::config::DataConfig;
use article_reco_engine::server::{configure_routes, AppState};
use article_reco_engine::{EngineConfig, RecommendationEngine, TableSource};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let service_config = ServiceConfig::from_env().context("Failed to load service config")?;
    service_config.validate()?;

    init_logging(&LogConfig {
        service_name: "reco-service".to_string(),
        level: service_config.log_level.clone(),
        format: service_config.log_format,
    })?;

    let engine_config = EngineConfig::from_env().context("Failed to load engine config")?;
    engine_config.validate()?;

    let data_config = DataConfig::from_env().context("Failed to load data config")?;
    data_config.validate()?;

    info!(
        host = %service_config.host,
        port = service_config.port,
        embeddings = %data_config.embeddings_path.display(),
        clicks = %data_config.clicks_path.display(),
        latent_factors = engine_config.svd.latent_factors,
        default_n = engine_config.default_n,
        "Starting reco-service"
    );

    let state = web::Data::new(AppState {
        engine: Arc::new(RecommendationEngine::new(engine_config)),
        source: TableSource::from_config(&data_config),
        request_timeout: service_config.request_timeout,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((service_config.host.as_str(), service_config.port))?
    .run()
    .await?;

    Ok(())
}
