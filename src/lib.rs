pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use std::sync::Arc;

pub use crate::{config::Config, error::AppError, state::AppState};

/// Build the full application router for `config`.
pub fn app(config: Config) -> axum::Router {
    routes::router(Arc::new(AppState::new(config)))
}
