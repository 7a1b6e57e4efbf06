pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::{AppConfig, CorsConfig, LoggingConfig, ServerConfig};
pub use observability::init_tracing;
pub use server::{GatewayServer, ServerBuilder, build_app};
