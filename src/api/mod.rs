use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::fetcher::InfoFetcher;

pub mod handlers;
pub mod models;

pub fn create_router(fetcher: Arc<InfoFetcher>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/info", get(handlers::info_handler))
        .with_state(fetcher)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
