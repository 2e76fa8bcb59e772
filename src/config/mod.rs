//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, Environment, ExtractionConfig, LogFormat, LoggingConfig, SecurityConfig,
    ServerConfig,
};
