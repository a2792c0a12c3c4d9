// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, record store and upstream clients, start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use config::{Config, RecordStoreKind};
use db::{CoffeeStoreRepository, MemoryRecordStore, RecordStore};
use dotenv::dotenv;
use services::{AirtableStore, FoursquareClient, PhotoSource, PlaceSource, UnsplashClient};
use std::io;
use std::sync::Arc;

/// Build the configured record store backend
async fn build_record_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.record_store {
        RecordStoreKind::Airtable => Arc::new(
            AirtableStore::new(
                config.airtable_api_key.clone(),
                &config.airtable_base_key,
                &config.airtable_table,
            )
            .context("failed to configure Airtable record store")?,
        ),
        RecordStoreKind::Postgres => {
            let pool = config::init_db_pool(config)
                .await
                .context("failed to connect to database")?;
            let repository = CoffeeStoreRepository::new(pool);
            repository
                .ensure_schema()
                .await
                .context("failed to prepare coffee_stores table")?;
            Arc::new(repository)
        }
        RecordStoreKind::Memory => {
            log::warn!("Using in-memory record store - records are lost on restart");
            Arc::new(MemoryRecordStore::new())
        }
    };

    Ok(store)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting coffee-stores service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize record store
    let store = match build_record_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to initialize record store: {:#}", e);
            std::process::exit(1);
        }
    };
    log::info!("Record store: {}", config.record_store.as_str());

    // 5. Upstream clients
    let places: Arc<dyn PlaceSource> =
        Arc::new(FoursquareClient::new(config.foursquare_api_key.clone()));
    let photos: Arc<dyn PhotoSource> =
        Arc::new(UnsplashClient::new(config.unsplash_access_key.clone()));

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (config, record store and upstream clients)
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(places.clone()))
            .app_data(web::Data::new(photos.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::coffee_stores_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
