//! Resolution tokens and their bar periods.
//!
//! Server side: a token maps to a period in seconds through [`ResolutionTable`].
//! Named entries win ("1D" -> 86400), then a positive integer `N` means `N` minutes,
//! and everything else falls back to the default period. The mapping never fails.
//!
//! Client side: [`server_token`] folds whatever a chart widget asks for into a token
//! the server understands.

pub const DEFAULT_PERIOD_SECS: i64 = 60;
pub const SECS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionTable {
    named: Vec<(String, i64)>,
    default_secs: i64,
}

impl Default for ResolutionTable {
    fn default() -> Self {
        Self {
            named: vec![("1D".to_string(), SECS_PER_DAY)],
            default_secs: DEFAULT_PERIOD_SECS,
        }
    }
}

impl ResolutionTable {
    /// Table with the given named tokens. Non-positive periods are dropped.
    pub fn new(named: Vec<(String, i64)>) -> Self {
        Self {
            named: named.into_iter().filter(|(_, secs)| *secs > 0).collect(),
            default_secs: DEFAULT_PERIOD_SECS,
        }
    }

    /// Parse `TOKEN:SECS` pairs separated by commas, e.g. `1D:86400,1W:604800`.
    pub fn parse(entries: &str) -> Result<Self, String> {
        let mut named = Vec::new();
        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, secs) = entry
                .split_once(':')
                .ok_or_else(|| format!("expected TOKEN:SECONDS, got '{entry}'"))?;
            let token = token.trim();
            if token.is_empty() {
                return Err(format!("empty resolution token in '{entry}'"));
            }
            let secs: i64 = secs
                .trim()
                .parse()
                .map_err(|_| format!("invalid period in '{entry}'"))?;
            if secs <= 0 {
                return Err(format!("period must be positive in '{entry}'"));
            }
            named.push((token.to_string(), secs));
        }
        Ok(Self::new(named))
    }

    pub fn period_secs(&self, token: &str) -> i64 {
        if let Some((_, secs)) = self.named.iter().find(|(name, _)| name == token) {
            return *secs;
        }
        match token.parse::<i64>() {
            Ok(minutes) if minutes > 0 => minutes.saturating_mul(60),
            _ => self.default_secs,
        }
    }
}

/// Map a chart widget's resolution to the server's token.
pub fn server_token(widget_resolution: &str) -> String {
    if widget_resolution.contains('D') {
        "1D".to_string()
    } else if widget_resolution.contains('W') {
        "1W".to_string()
    } else if widget_resolution.contains('M') {
        "1M".to_string()
    } else if widget_resolution.parse::<u32>().is_ok() {
        widget_resolution.to_string()
    } else {
        "60".to_string()
    }
}
