mod config;
mod error;
mod managers;
mod messages;
mod services;
mod state;

use crate::config::AppConfig;
use crate::managers::{DirectorySchemaManager, FileSourceManager, SqliteResourceManager};
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::init().map_err(std::io::Error::other)?;
    let schemas = DirectorySchemaManager::load(&config.schemas_dir).map_err(std::io::Error::other)?;
    let resources =
        SqliteResourceManager::open(config.resources_db()).map_err(std::io::Error::other)?;
    let sources = FileSourceManager::new(config.data_dir.clone());

    let state = AppState::new(Arc::new(schemas), Arc::new(sources), Arc::new(resources));
    let json_limit = config.json_limit;

    info!("Server running at {}", config.url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::PayloadConfig::default().limit(json_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
