//! HTTP API handlers for tutortrack-ri

pub mod health;
pub mod reconcile;
pub mod resolve;
pub mod sse;

pub use health::health_routes;
pub use reconcile::reconcile_routes;
pub use resolve::resolve_routes;
pub use sse::event_stream;
