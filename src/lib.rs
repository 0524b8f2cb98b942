pub mod app;
pub mod config;
pub mod converter;
pub mod docs;
pub mod errors;
pub mod extract;
pub mod models;
pub mod routes;

// Re-export commonly used items for tests
pub use app::{create_app, create_default_app, AppState};
pub use converter::{BallerinaSwaggerConverter, ConversionError, SwaggerConverter};
