use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::converter::{BallerinaSwaggerConverter, SwaggerConverter};
use crate::routes::{health, swagger};

#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<dyn SwaggerConverter>,
}

impl AppState {
    pub fn new(converter: Arc<dyn SwaggerConverter>) -> Self {
        Self { converter }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(BallerinaSwaggerConverter::new()))
    }
}

pub fn create_app(state: AppState) -> Router {
    // the conversion endpoints answer their own pre-flight requests with a
    // fixed header set, so the generic CORS layer only wraps the health routes
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let swagger_routes = Router::new()
        .route(
            "/ballerina-to-swagger",
            post(swagger::convert_to_swagger).options(swagger::preflight),
        )
        .route(
            "/swagger-to-ballerina",
            post(swagger::convert_to_ballerina).options(swagger::preflight),
        );

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .layer(cors);

    Router::new()
        .nest("/service/swagger", swagger_routes)
        .nest("/api", health_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Router backed by the bundled converter.
pub fn create_default_app() -> Router {
    create_app(AppState::default())
}
