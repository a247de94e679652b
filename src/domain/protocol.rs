//! UDF wire format: the JSON bodies exchanged between the feed server and the
//! client adapter.
//!
//! History travels column-oriented with second-granular times; [`Bar`] is
//! row-oriented with millisecond times. [`HistoryColumns`] converts between the two.

use serde::{Deserialize, Serialize};

use crate::domain::bar::Bar;
use crate::domain::error::FeedError;

/// Capability discovery answer (`GET /config`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatafeedConfiguration {
    pub supports_search: bool,
    pub supports_group_request: bool,
    pub supported_resolutions: Vec<String>,
    pub supports_marks: bool,
    pub supports_time: bool,
}

/// Symbol descriptor (`GET /symbol_info`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub ticker: String,
    pub description: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
    pub session: String,
    pub timezone: String,
    pub minmov: u32,
    pub pricescale: u32,
    pub has_intraday: bool,
    pub supported_resolutions: Vec<String>,
}

/// One entry of a symbol search answer. Search is unsupported, so the adapter
/// only ever returns an empty list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub full_name: String,
    pub description: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTime {
    pub time: i64,
}

/// Plain error body used outside the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The six parallel history arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryColumns {
    pub t: Vec<i64>,
    pub o: Vec<f64>,
    pub h: Vec<f64>,
    pub l: Vec<f64>,
    pub c: Vec<f64>,
    pub v: Vec<i64>,
}

impl HistoryColumns {
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut cols = Self {
            t: Vec::with_capacity(bars.len()),
            o: Vec::with_capacity(bars.len()),
            h: Vec::with_capacity(bars.len()),
            l: Vec::with_capacity(bars.len()),
            c: Vec::with_capacity(bars.len()),
            v: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            cols.t.push(bar.time_secs());
            cols.o.push(bar.open);
            cols.h.push(bar.high);
            cols.l.push(bar.low);
            cols.c.push(bar.close);
            cols.v.push(bar.volume);
        }
        cols
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Zip the columns back into rows, index order, times scaled to milliseconds.
    ///
    /// Ragged columns are rejected whole rather than truncated.
    pub fn into_bars(self) -> Result<Vec<Bar>, FeedError> {
        let n = self.t.len();
        let lengths = [self.o.len(), self.h.len(), self.l.len(), self.c.len(), self.v.len()];
        if lengths.iter().any(|&len| len != n) {
            return Err(FeedError::Protocol {
                reason: format!(
                    "history columns differ in length: t={n}, o/h/l/c/v={lengths:?}"
                ),
            });
        }

        self.t
            .into_iter()
            .zip(self.o)
            .zip(self.h)
            .zip(self.l)
            .zip(self.c)
            .zip(self.v)
            .map(|(((((t, open), high), low), close), volume)| -> Result<Bar, FeedError> {
                let time = t.checked_mul(1000).ok_or_else(|| FeedError::Protocol {
                    reason: format!("history time {t} overflows milliseconds"),
                })?;
                Ok(Bar {
                    time,
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            })
            .collect()
    }
}

/// History outcome (`GET /history`), tagged by `s`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "s", rename_all = "snake_case")]
pub enum HistoryResponse {
    Ok(HistoryColumns),
    NoData,
    Error { errmsg: String },
}
