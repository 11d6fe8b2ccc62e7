//! API Routes

pub mod health;
pub mod quotes;

pub use health::health_router;
pub use quotes::quotes_router;
