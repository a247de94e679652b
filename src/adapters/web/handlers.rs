//! HTTP request handlers for the UDF endpoints.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use std::sync::Arc;

use crate::domain::feed::{HistoryQuery, server_time};
use crate::domain::protocol::{DatafeedConfiguration, HistoryResponse, ServerTime, SymbolInfo};

use super::{AppState, WebError};

#[derive(Debug, Default, serde::Deserialize)]
pub struct SymbolParams {
    pub symbol: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct HistoryParams {
    pub symbol: Option<String>,
    pub resolution: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn config(State(state): State<Arc<AppState>>) -> Json<DatafeedConfiguration> {
    Json(state.settings.configuration())
}

pub async fn symbol_info(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SymbolParams>, QueryRejection>,
) -> Result<Json<SymbolInfo>, WebError> {
    let Query(params) = params.map_err(|e| WebError::bad_request(e.body_text()))?;
    let info = state.settings.symbol_info(params.symbol)?;
    Ok(Json(info))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, WebError> {
    let Query(params) = params.map_err(|e| WebError::bad_request(e.body_text()).udf())?;
    let query = HistoryQuery::from_params(params.symbol, params.resolution, params.from, params.to)
        .map_err(|e| WebError::from(e).udf())?;

    let outcome = state.settings.history(&query, &mut rand::thread_rng());
    if let HistoryResponse::Ok(cols) = &outcome {
        tracing::info!(
            symbol = %query.symbol,
            resolution = %query.resolution,
            bars = cols.len(),
            "history ok"
        );
    } else {
        tracing::info!(
            symbol = %query.symbol,
            from = query.from,
            to = query.to,
            "history no_data"
        );
    }
    Ok(Json(outcome))
}

pub async fn time() -> Json<ServerTime> {
    Json(server_time(chrono::Utc::now()))
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such endpoint")
}
