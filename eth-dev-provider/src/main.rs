use tracing_subscriber::EnvFilter;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

mod api;
mod config;
mod engine;
mod error;
mod factory;
mod models;
mod rpc;
mod subproviders;

/// Application entry point
///
/// This is the main function that:
/// 1. Sets up logging
/// 2. Loads configuration
/// 3. Assembles and starts the provider pipeline
/// 4. Starts the HTTP server exposing the pipeline as a JSON-RPC endpoint
#[actix_web::main] // Actix will build a multithreaded runtime
async fn main() -> std::io::Result<()> {
    // Configure logging with appropriate log levels for different components
    // - Info level for our service
    // - Lower levels for dependencies to reduce noise
    let filter = EnvFilter::from_default_env()
        .add_directive("eth_dev_provider=info".parse().unwrap())
        .add_directive("actix_web=error".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("alloy=warn".parse().unwrap());

    // Initialize the tracing subscriber with our filter
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    // Load configuration from environment variables
    let config = config::Config::from_env().expect("Failed to load config");

    // Assemble the provider pipeline and start it
    let engine = factory::get_rpc_provider(&config.provider)
        .await
        .expect("Failed to start provider pipeline");
    let engine = Arc::new(engine);

    // Create and start HTTP server
    HttpServer::new(move || {
        App::new()
            // Add logging middleware
            .wrap(TracingLogger::default())
            // Register the engine as application data (shared between requests)
            .app_data(web::Data::new(engine.clone()))
            // Configure API routes
            .configure(api::configure)
    })
    // Set number of worker threads
    .workers(4)
    // Bind to host/port from configuration
    .bind(format!("{}:{}", config.host, config.port))?
    // Start the server
    .run()
    .await
}
