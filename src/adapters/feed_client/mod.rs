//! Client-side feed adapter: the operations a chart widget drives.
//!
//! Each operation issues at most one request and completes through its returned
//! future with exactly one of success or error. The adapter keeps no request
//! bookkeeping: overlapping `get_bars` calls are neither ordered nor cancelled, so
//! callers discard stale answers themselves.

mod http_transport;

pub use http_transport::HttpTransport;

use serde::de::DeserializeOwned;

use crate::domain::bar::Bar;
use crate::domain::error::FeedError;
use crate::domain::protocol::{
    DatafeedConfiguration, ErrorBody, HistoryResponse, SearchResult, ServerTime, SymbolInfo,
};
use crate::domain::resolution::server_token;
use crate::ports::transport_port::{FeedTransport, TransportResponse};

/// The window a widget asks for, in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodParams {
    pub from: i64,
    pub to: i64,
    pub first_data_request: bool,
}

/// Answer to `get_bars`. `no_data` is set only when the server had nothing for the
/// window; `bars` is then empty.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBars {
    pub bars: Vec<Bar>,
    pub no_data: bool,
}

pub struct FeedAdapter<T> {
    transport: T,
}

impl<T: FeedTransport> FeedAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the datafeed configuration.
    ///
    /// Resolves at least one scheduler tick after the fetch completes, so a widget
    /// awaiting this from its own setup is never signalled synchronously. On failure
    /// the widget must not be told it is ready.
    pub async fn on_ready(&self) -> Result<DatafeedConfiguration, FeedError> {
        let config: DatafeedConfiguration = self
            .fetch_json("/config", &[])
            .await
            .inspect_err(|e| tracing::error!("datafeed configuration unavailable: {e}"))?;
        tokio::task::yield_now().await;
        Ok(config)
    }

    /// Search is unsupported; the answer is always empty.
    pub fn search_symbols(
        &self,
        user_input: &str,
        exchange: &str,
        symbol_type: &str,
    ) -> Vec<SearchResult> {
        tracing::debug!(user_input, exchange, symbol_type, "symbol search not supported");
        Vec::new()
    }

    pub async fn resolve_symbol(&self, symbol_name: &str) -> Result<SymbolInfo, FeedError> {
        self.fetch_json("/symbol_info", &[("symbol", symbol_name.to_string())])
            .await
            .inspect_err(|e| tracing::warn!(symbol = symbol_name, "resolve failed: {e}"))
    }

    pub async fn get_bars(
        &self,
        symbol_info: &SymbolInfo,
        resolution: &str,
        period: PeriodParams,
    ) -> Result<HistoryBars, FeedError> {
        let server_resolution = server_token(resolution);
        tracing::debug!(
            symbol = %symbol_info.ticker,
            resolution,
            server_resolution = %server_resolution,
            from = period.from,
            to = period.to,
            first = period.first_data_request,
            "requesting bars"
        );
        let query = [
            ("symbol", symbol_info.ticker.clone()),
            ("resolution", server_resolution),
            ("from", period.from.to_string()),
            ("to", period.to.to_string()),
        ];
        let response = self.transport.get("/history", &query).await?;

        let outcome: HistoryResponse = match serde_json::from_str(&response.body) {
            Ok(outcome) => outcome,
            Err(_) if !response.is_success() => return Err(status_error(&response)),
            Err(e) => {
                return Err(FeedError::Protocol {
                    reason: format!("invalid /history body: {e}"),
                });
            }
        };

        match outcome {
            HistoryResponse::NoData => Ok(HistoryBars {
                bars: Vec::new(),
                no_data: true,
            }),
            HistoryResponse::Ok(cols) => Ok(HistoryBars {
                bars: cols.into_bars()?,
                no_data: false,
            }),
            HistoryResponse::Error { errmsg } => Err(FeedError::Rejected { message: errmsg }),
        }
    }

    /// No streaming backend: the tick callback is dropped and nothing is registered.
    pub fn subscribe_bars<F>(
        &self,
        symbol_info: &SymbolInfo,
        resolution: &str,
        on_tick: F,
        listener_guid: &str,
    ) where
        F: FnMut(Bar),
    {
        drop(on_tick);
        tracing::debug!(
            symbol = %symbol_info.ticker,
            resolution,
            listener_guid,
            "realtime updates not available"
        );
    }

    pub fn unsubscribe_bars(&self, listener_guid: &str) {
        tracing::debug!(listener_guid, "unsubscribe ignored");
    }

    pub async fn server_time(&self) -> Result<i64, FeedError> {
        let time: ServerTime = self.fetch_json("/time", &[]).await?;
        Ok(time.time)
    }

    async fn fetch_json<D: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<D, FeedError> {
        let response = self.transport.get(path, query).await?;
        if !response.is_success() {
            return Err(status_error(&response));
        }
        serde_json::from_str(&response.body).map_err(|e| FeedError::Protocol {
            reason: format!("invalid {path} body: {e}"),
        })
    }
}

/// Turn a non-2xx answer into an error, preferring the server's own message.
fn status_error(response: &TransportResponse) -> FeedError {
    match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => FeedError::Rejected {
            message: body.error,
        },
        Err(_) => FeedError::Transport {
            reason: format!("HTTP {}", response.status),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_server_message() {
        let err = status_error(&TransportResponse {
            status: 400,
            body: r#"{"error":"missing required parameter: symbol"}"#.into(),
        });
        assert_eq!(err.to_string(), "missing required parameter: symbol");
    }

    #[test]
    fn status_error_falls_back_to_status() {
        let err = status_error(&TransportResponse {
            status: 502,
            body: "<html>bad gateway</html>".into(),
        });
        assert!(matches!(err, FeedError::Transport { ref reason } if reason == "HTTP 502"));
    }
}
