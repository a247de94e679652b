//! Feed endpoint operations as plain functions over [`FeedSettings`].
//!
//! The HTTP layer only extracts query strings and serializes what these return.

use chrono::{DateTime, Utc};

use crate::domain::error::FeedError;
use crate::domain::generator::JitterSource;
use crate::domain::protocol::{
    DatafeedConfiguration, HistoryColumns, HistoryResponse, ServerTime, SymbolInfo,
};
use crate::domain::settings::FeedSettings;

pub const SESSION_24X7: &str = "24x7";
pub const TIMEZONE_UTC: &str = "Etc/UTC";
pub const MIN_MOVE: u32 = 1;
pub const PRICE_SCALE: u32 = 100;

/// A validated history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub symbol: String,
    pub resolution: String,
    pub from: i64,
    pub to: i64,
}

fn required(name: &str, value: Option<String>) -> Result<String, FeedError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FeedError::missing(name))
}

/// Epoch seconds that still fit once scaled to milliseconds.
fn epoch_secs(name: &str, value: String) -> Result<i64, FeedError> {
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| FeedError::invalid(name, format!("'{value}' is not an integer timestamp")))?;
    match secs.checked_mul(1000) {
        Some(_) => Ok(secs),
        None => Err(FeedError::invalid(
            name,
            format!("{secs} is out of range for a millisecond timestamp"),
        )),
    }
}

impl HistoryQuery {
    /// Build from raw query parameters. Absent or empty parameters are missing.
    pub fn from_params(
        symbol: Option<String>,
        resolution: Option<String>,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<Self, FeedError> {
        let symbol = required("symbol", symbol)?;
        let resolution = required("resolution", resolution)?;
        let from = required("from", from)?;
        let to = required("to", to)?;
        Ok(Self {
            symbol,
            resolution,
            from: epoch_secs("from", from)?,
            to: epoch_secs("to", to)?,
        })
    }
}

impl FeedSettings {
    pub fn configuration(&self) -> DatafeedConfiguration {
        DatafeedConfiguration {
            supports_search: false,
            supports_group_request: false,
            supported_resolutions: self.supported_resolutions.clone(),
            supports_marks: false,
            supports_time: true,
        }
    }

    pub fn symbol_info(&self, symbol: Option<String>) -> Result<SymbolInfo, FeedError> {
        let symbol = required("symbol", symbol)?;
        Ok(SymbolInfo {
            name: symbol.clone(),
            ticker: symbol.clone(),
            description: symbol,
            symbol_type: self.symbol_type.clone(),
            session: SESSION_24X7.to_string(),
            timezone: TIMEZONE_UTC.to_string(),
            minmov: MIN_MOVE,
            pricescale: PRICE_SCALE,
            has_intraday: true,
            supported_resolutions: self.supported_resolutions.clone(),
        })
    }

    /// `no_data` for `to <= from` or an empty series, otherwise `ok` with the
    /// generated bars as columns.
    pub fn history<J: JitterSource + ?Sized>(
        &self,
        query: &HistoryQuery,
        jitter: &mut J,
    ) -> HistoryResponse {
        if query.to <= query.from {
            tracing::debug!(symbol = %query.symbol, from = query.from, to = query.to, "empty window");
            return HistoryResponse::NoData;
        }

        let bars = self.generator.generate(
            &query.symbol,
            &query.resolution,
            query.from,
            query.to,
            jitter,
        );
        if bars.is_empty() {
            return HistoryResponse::NoData;
        }

        tracing::debug!(
            symbol = %query.symbol,
            resolution = %query.resolution,
            bars = bars.len(),
            "generated history"
        );
        HistoryResponse::Ok(HistoryColumns::from_bars(&bars))
    }
}

pub fn server_time(now: DateTime<Utc>) -> ServerTime {
    ServerTime {
        time: now.timestamp(),
    }
}
