mod catalog;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod results;
mod topics;

use catalog::DomainCatalog;
use config::Config;
use db::Database;
use handlers::AppState;
use log::{error, info, warn};
use std::sync::Arc;
use topics::TopicGenerator;
use topics::llm::OpenAiClient;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let catalog = match &config.catalog_path {
        Some(path) => match DomainCatalog::from_path(path) {
            Ok(catalog) => {
                info!("Loaded domain catalog from {}", path.display());
                catalog
            }
            Err(e) => {
                error!("Failed to load domain catalog from {}: {}", path.display(), e);
                return;
            }
        },
        None => DomainCatalog::builtin(),
    };

    let database = match Database::new(&config.database_url, config.database_max_connections).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, topics will be generated from demo data");
    }
    let llm = match OpenAiClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.llm_timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build completion client: {}", e);
            return;
        }
    };

    let generator = TopicGenerator::new(Arc::new(catalog), Arc::new(llm), config.llm_timeout);
    let state = AppState {
        database,
        generator: Arc::new(generator),
        share_base_url: Arc::from(config.share_base_url.as_str()),
    };

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr, e);
            return;
        }
    };
    info!("Community poll service listening on {}", config.bind_addr);

    if let Err(why) = axum::serve(listener, handlers::router(state)).await {
        error!("Server error: {:?}", why);
    }
}
