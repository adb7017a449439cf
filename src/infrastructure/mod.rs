// Infrastructure layer: configuration, logging, adapters and server lifecycle

pub mod config;
pub mod cors;
pub mod logging;
pub mod openai;
pub mod server;
pub mod shutdown;
pub mod tabular;

pub use config::{AppConfig, ConfigError};
pub use logging::init_logging;
pub use openai::OpenAiChatProvider;
pub use server::{build_router, start_server, ServerConfig};
