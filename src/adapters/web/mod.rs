//! Web server adapter: the UDF endpoints over axum.
//!
//! Every route is a thin wrapper around an operation on
//! [`FeedSettings`](crate::domain::settings::FeedSettings); handlers share nothing
//! mutable. A panicking handler is answered with a UDF error outcome.

mod error;
mod handlers;

pub use error::{ErrorShape, WebError, panic_response, status_from_error};
pub use handlers::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::domain::settings::FeedSettings;

pub struct AppState {
    pub settings: FeedSettings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/config", get(handlers::config))
        .route("/symbol_info", get(handlers::symbol_info))
        .route("/history", get(handlers::history))
        .route("/time", get(handlers::time))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(Arc::new(state))
}
