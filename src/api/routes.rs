use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{handlers, state::AppState};

/// Layers applied around the routes
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterOptions {
    pub cors: bool,
    pub trace: bool,
}

pub fn create_router(state: AppState) -> Router {
    create_router_with(state, RouterOptions::default())
}

pub fn create_router_with(state: AppState, options: RouterOptions) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/predict", post(handlers::predict_handler))
        .with_state(state);

    if options.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    if options.trace {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}
