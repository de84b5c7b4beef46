// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, services, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use db::PgPoiStore;
use dotenv::dotenv;
use services::{
    CacheWriter, NeshanClient, PoiService, PriceProvider, PriceService, SnappClient, TapsiClient,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

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

    log::info!("Starting nearby-poi microservice...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool (runs migrations)
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Wire the POI pipeline: maps client, store, write-back worker
    let store: Arc<dyn db::PoiStore> = Arc::new(PgPoiStore::new(pool.clone()));
    let maps = Arc::new(NeshanClient::new(config.neshan_api_key.clone()));

    let (writer, _writer_handle) = CacheWriter::spawn(
        Arc::clone(&store),
        config.write_back_queue_depth,
        Duration::from_secs(config.write_back_timeout_secs),
    );
    log::info!(
        "Started cache write-back worker (queue: {}, timeout: {}s)",
        config.write_back_queue_depth,
        config.write_back_timeout_secs
    );

    let poi_service = web::Data::new(PoiService::new(maps, store, writer, config.poi_limit));

    // 6. Ride-price providers
    let providers: Vec<Arc<dyn PriceProvider>> = vec![
        Arc::new(SnappClient::new(
            config.snapp_access_token.clone(),
            config.snapp_cookie.clone(),
        )),
        Arc::new(TapsiClient::new(
            config.tapsi_access_token.clone(),
            config.tapsi_cookie.clone(),
        )),
    ];
    let price_service = web::Data::new(PriceService::new(providers));

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (database pool, config, and services)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(poi_service.clone())
            .app_data(price_service.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::nearby_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
