//! Web read API for newsdesk.
//!
//! A thin JSON view over the current collection plus static file serving.

pub mod cors;
pub mod handlers;
pub mod router;
pub mod server;

pub use handlers::{AppState, NewsResponse};
pub use router::create_router;
pub use server::WebServer;
