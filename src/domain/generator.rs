//! Synthetic OHLCV bar generator.
//!
//! Every bar is re-derived from `(symbol, bucket index)`:
//!
//! - seed = polynomial hash of the symbol (x31, mod 100000); base = floor + seed mod band
//! - level(idx) = base * (1 + 0.02*sin(idx/10 + seed mod 10) + 0.002*sin(idx))
//! - open = level * (1 + 0.003*sin(idx+1)), close = level * (1 + 0.003*cos(idx+2)), 2 dp
//! - high/low widen max/min(open, close) by a jitter drawn from [0.001, 0.003)
//! - volume = floor(100 + |sin(idx)| * 1000)
//!
//! Open, close and volume depend only on the bucket index and the symbol, so two
//! queries over overlapping ranges agree on every shared bucket. High and low are the
//! only values that vary between calls.

use rand::Rng;
use std::ops::Range;

use crate::domain::bar::Bar;
use crate::domain::resolution::ResolutionTable;

pub const DEFAULT_MAX_POINTS: usize = 2000;
pub const DEFAULT_BASE_PRICE: f64 = 20_000.0;
pub const DEFAULT_PRICE_BAND: u64 = 10_000;
pub const JITTER_RANGE: Range<f64> = 0.001..0.003;

const SEED_MODULUS: u64 = 100_000;

/// Source of the high/low wick jitter. Values must lie in [`JITTER_RANGE`].
pub trait JitterSource {
    fn jitter(&mut self) -> f64;
}

impl<R: Rng + ?Sized> JitterSource for R {
    fn jitter(&mut self) -> f64 {
        self.gen_range(JITTER_RANGE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub max_points: usize,
    pub base_price: f64,
    pub price_band: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            base_price: DEFAULT_BASE_PRICE,
            price_band: DEFAULT_PRICE_BAND,
        }
    }
}

/// Bucket boundaries of one query: `from + i * period` for `i` in `0..=count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: i64,
    pub period: i64,
    pub count: i64,
}

impl Window {
    /// Lay out the buckets of `[from, to]` at `period` seconds.
    ///
    /// The bucket count is capped at `max_points`. A request for more buckets than
    /// the cap is right-anchored: `from` moves forward to `to - max_points * period`
    /// so the caller receives the most recent buckets, ending exactly at `to`. This
    /// is the feed's backpressure policy and never an error.
    ///
    /// Returns `None` when `to < from` or `period` is not positive.
    pub fn clamp(from: i64, to: i64, period: i64, max_points: usize) -> Option<Self> {
        if period <= 0 || to < from {
            return None;
        }
        let naive = to.saturating_sub(from) / period;
        let cap = i64::try_from(max_points).unwrap_or(i64::MAX);
        if naive > cap {
            Some(Self {
                from: to.saturating_sub(cap.saturating_mul(period)),
                period,
                count: cap,
            })
        } else {
            Some(Self {
                from,
                period,
                count: naive,
            })
        }
    }

    /// Number of bars emitted; both ends of the window are inclusive.
    pub fn bar_count(&self) -> usize {
        usize::try_from(self.count).map_or(0, |c| c + 1)
    }

    pub fn times(self) -> impl Iterator<Item = i64> {
        (0..=self.count).map(move |i| self.from.saturating_add(i.saturating_mul(self.period)))
    }
}

/// Fold the symbol's characters into a bounded seed.
pub fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .chars()
        .fold(0u64, |seed, ch| (seed * 31 + u64::from(ch)) % SEED_MODULUS)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarGenerator {
    pub config: GeneratorConfig,
    pub resolutions: ResolutionTable,
}

impl BarGenerator {
    pub fn new(config: GeneratorConfig, resolutions: ResolutionTable) -> Self {
        Self {
            config,
            resolutions,
        }
    }

    pub fn period_secs(&self, resolution: &str) -> i64 {
        self.resolutions.period_secs(resolution)
    }

    pub fn base_price(&self, symbol: &str) -> f64 {
        let seed = symbol_seed(symbol);
        self.config.base_price + seed.checked_rem(self.config.price_band).unwrap_or(0) as f64
    }

    /// Bars for `symbol` at `resolution` covering `[from_s, to_s]` (epoch seconds),
    /// ascending by time. Empty when `to_s < from_s` or when either bound has no
    /// millisecond representation; callers treat `to_s <= from_s` as "no data"
    /// before getting here.
    pub fn generate<J: JitterSource + ?Sized>(
        &self,
        symbol: &str,
        resolution: &str,
        from_s: i64,
        to_s: i64,
        jitter: &mut J,
    ) -> Vec<Bar> {
        if from_s.checked_mul(1000).is_none() || to_s.checked_mul(1000).is_none() {
            return Vec::new();
        }
        let period = self.period_secs(resolution);
        let Some(window) = Window::clamp(from_s, to_s, period, self.config.max_points) else {
            return Vec::new();
        };
        let seed = symbol_seed(symbol);
        let base = self.base_price(symbol);

        let mut bars = Vec::with_capacity(window.bar_count());
        for t in window.times() {
            bars.push(bar_at(t, period, seed, base, jitter));
        }
        bars
    }
}

fn bar_at<J: JitterSource + ?Sized>(t: i64, period: i64, seed: u64, base: f64, jitter: &mut J) -> Bar {
    let x = t.div_euclid(period) as f64;
    let phase = (seed % 10) as f64;
    let level = base * (1.0 + 0.02 * (x / 10.0 + phase).sin() + 0.002 * x.sin());

    let open = round2(level * (1.0 + 0.003 * (x + 1.0).sin()));
    let close = round2(level * (1.0 + 0.003 * (x + 2.0).cos()));
    let high = open.max(close) * (1.0 + jitter.jitter());
    let low = open.min(close) * (1.0 - jitter.jitter());
    let volume = (100.0 + x.sin().abs() * 1000.0).floor() as i64;

    Bar {
        time: t.saturating_mul(1000),
        open,
        high,
        low,
        close,
        volume,
    }
}
