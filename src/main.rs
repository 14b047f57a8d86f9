use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use asana_recommender::config::{LoggingSettings, Settings};
use asana_recommender::routes::{self, recommend::AppState};
use asana_recommender::services::{build_embedder, Catalog, RecommendationCache};
use asana_recommender::Recommender;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging
    init_logging(&settings.logging);

    info!("Starting Asana Recommender service...");

    // Initialize embedding provider
    let embedder = match build_embedder(&settings.embedding) {
        Ok(embedder) => embedder,
        Err(e) => {
            error!("Failed to initialize embedder: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!(
        "Embedder initialized: {} ({} dimensions)",
        embedder.name(),
        embedder.dimensions()
    );

    // Load the catalog before serving anything
    let catalog = match Catalog::load(&settings.catalog.path, embedder.name(), embedder.dimensions()) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!("Failed to load catalog from {}: {}", settings.catalog.path, e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    // Initialize recommender with configured scoring
    let recommender_settings = settings.scoring.to_recommender_settings();
    let recommender = Arc::new(Recommender::new(catalog, embedder, recommender_settings));

    info!("Recommender initialized with settings: {:?}", recommender_settings);

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(3600);
    let cache_entries = settings.cache.max_entries.unwrap_or(1000);
    let cache = Arc::new(RecommendationCache::new(cache_entries, cache_ttl));

    info!("Recommendation cache initialized ({} entries, TTL: {}s)", cache_entries, cache_ttl);

    // Build application state
    let app_state = AppState { recommender, cache };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
