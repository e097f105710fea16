#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for US language lookups.
//!
//! Serves `GET /languages/us`, which answers with the five most spoken
//! non-English languages in a state, county or ZCTA according to the
//! Census Bureau American Community Survey (table `B16001`).

pub mod config;
mod errors;
mod handlers;
pub mod languages;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use us_languages_census::client::CensusClient;

pub use config::{ConfigError, ServerConfig};
pub use errors::ApiError;

/// Shared application state.
pub struct AppState {
    /// Census API client (shared connection pool).
    pub census: CensusClient,
    /// Census API key sent with every table request.
    pub api_key: String,
}

/// Registers the API routes.
///
/// Query strings that cannot be decoded (e.g. a missing `location_type`)
/// are answered with the same JSON error body as other client errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::InvalidQuery(err.to_string()).into()),
    )
    .route("/health", web::get().to(handlers::health))
    .route("/languages/us", web::get().to(handlers::languages));
}

/// Starts the language lookup API server.
///
/// Loads `.env` (if present), initializes logging, reads
/// [`ServerConfig`] from the environment and starts the Actix-Web HTTP
/// server. The caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid
/// (e.g. `CENSUS_API_KEY` is unset), the Census client cannot be built, or
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // Logging is not initialized yet.
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let census = CensusClient::new(&config.census_base_url).map_err(std::io::Error::other)?;

    log::info!("Using Census API at {}", census.base_url());

    let state = web::Data::new(AppState {
        census,
        api_key: config.api_key,
    });

    let bind_addr = config.bind_addr;
    let port = config.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
