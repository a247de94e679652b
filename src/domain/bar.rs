//! OHLCV bar representation.

use serde::{Deserialize, Serialize};

/// One candle. `time` is the bucket start in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Bucket start in epoch seconds, floored.
    pub fn time_secs(&self) -> i64 {
        self.time.div_euclid(1000)
    }

    /// low <= min(open, close) and high >= max(open, close)
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }
}
