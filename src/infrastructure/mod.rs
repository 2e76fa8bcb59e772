//! Infrastructure layer - External service implementations

pub mod extraction;
pub mod http;
pub mod intake;
pub mod logging;
pub mod observability;
pub mod rate_limit;
pub mod services;
