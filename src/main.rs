use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gift_roulette_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::TelegramService,
    handlers,
    middlewares::create_cors,
    services::{CatalogService, LedgerService, SpinService},
    swagger::swagger_config,
    utils::InitDataVerifier,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    if config.telegram.bot_token.is_empty() {
        log::warn!("BOT_TOKEN is empty; all init-data verification will fail");
    }

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let verifier = InitDataVerifier::new(&config.telegram.bot_token);
    let telegram_service = TelegramService::new(config.telegram.clone());
    let catalog_service = CatalogService::new(pool.clone());
    let ledger_service = LedgerService::new(pool.clone());
    let spin_service = SpinService::new(
        pool.clone(),
        verifier,
        catalog_service,
        ledger_service,
        telegram_service,
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(spin_service.clone()))
            .configure(swagger_config)
            .configure(handlers::roulette_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
