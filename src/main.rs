use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use newsdesk::{spawn_crawler, Config, NewsService, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = newsdesk::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        newsdesk::logging::init_console_only(&config.logging.level);
    }

    info!("newsdesk - AI news feed aggregator");

    let service = match NewsService::from_config(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to create news service: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = service.load().await {
        error!("Failed to load snapshot, starting empty: {}", e);
    }

    let crawler = spawn_crawler(
        Arc::clone(&service),
        Duration::from_secs(config.crawler.interval_secs),
    );

    if config.web.enabled {
        let server = match WebServer::new(&config.web, service.reader()) {
            Ok(server) => server,
            Err(e) => {
                error!("Failed to create web server: {}", e);
                crawler.shutdown().await;
                std::process::exit(1);
            }
        };

        if let Err(e) = server.run(shutdown_signal()).await {
            error!("Web server error: {}", e);
        }
    } else {
        info!("Web server disabled");
        shutdown_signal().await;
    }

    crawler.shutdown().await;
    info!("newsdesk stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
