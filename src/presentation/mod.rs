// Presentation layer - HTTP routes, handlers and error responses
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod router;
