//! Web server for newsdesk.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::handlers::AppState;
use super::router::create_router;
use crate::config::WebConfig;
use crate::news::SharedCollection;
use crate::Result;

/// Web server for the read API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server over a collection reader.
    pub fn new(config: &WebConfig, news: SharedCollection) -> Result<Self> {
        Ok(Self {
            addr: config.bind_addr()?,
            app_state: Arc::new(AppState::new(news)),
            web_config: config.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `shutdown` completes.
    pub async fn run<S>(self, shutdown: S) -> std::result::Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let router = create_router(self.app_state, &self.web_config);

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        tracing::info!("API: http://{}/api/news", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Start serving in the background and return the bound address.
    ///
    /// Useful for tests when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = create_router(self.app_state, &self.web_config);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> WebConfig {
        WebConfig {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 0,
            serve_static: false,
            static_path: ".".to_string(),
            cors_origins: vec![],
        }
    }

    #[test]
    fn test_web_server_new() {
        let server = WebServer::new(&create_test_config(), SharedCollection::new()).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_web_server_rejects_bad_address() {
        let mut config = create_test_config();
        config.host = "nowhere at all".to_string();
        assert!(WebServer::new(&config, SharedCollection::new()).is_err());
    }

    #[tokio::test]
    async fn test_web_server_run_with_addr() {
        let server = WebServer::new(&create_test_config(), SharedCollection::new()).unwrap();
        let addr = server.run_with_addr().await.unwrap();
        assert_ne!(addr.port(), 0);
    }
}
