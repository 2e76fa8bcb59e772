//! API layer - HTTP endpoints and middleware

pub mod extract;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, EXTRACT_TEXT_PATH};
pub use state::AppState;
