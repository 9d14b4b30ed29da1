//! HTTP API handlers for culture-relay

pub mod colors;
pub mod comment;
pub mod health;
pub mod upload;

pub use colors::color_routes;
pub use comment::feedback_routes;
pub use health::health_routes;
pub use upload::upload_routes;
