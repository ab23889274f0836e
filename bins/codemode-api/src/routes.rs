// Route definitions for the judge API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/judge/check", post(handlers::check_answer))
        .route("/languages", get(handlers::list_languages))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health_check))
}
