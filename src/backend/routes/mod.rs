//! Route Configuration Module
//!
//! - **`router`** - Main router creation, health check and HTTP layers
//! - **`api_routes`** - Authentication endpoints under `/api`

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
