//! Rate limit store implementations

mod in_memory;

pub use in_memory::InMemoryRateLimiter;
