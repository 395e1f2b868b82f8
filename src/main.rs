mod config;
mod error;
mod model;
mod web;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use config::Config;
use model::ChatRelay;
use web::routes;

// App state structure
pub struct AppState {
    relay: ChatRelay,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Alpha Soil backend");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    let relay = match ChatRelay::new(config) {
        Ok(relay) => relay,
        Err(e) => {
            error!("Failed to initialize chat relay: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = Data::new(AppState { relay });

    info!("Server running on http://localhost:{}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
