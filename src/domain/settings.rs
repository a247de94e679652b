//! Feed and client settings, read from a [`ConfigPort`].
//!
//! ```ini
//! [feed]
//! max_points = 2000
//! supported_resolutions = 1,5,15,60,240,1D
//! named_resolutions = 1D:86400
//! base_price = 20000
//! price_band = 10000
//! symbol_type = crypto
//!
//! [client]
//! base_url = http://127.0.0.1:8080
//! timeout_secs = 0
//! ```

use std::time::Duration;

use crate::domain::error::FeedError;
use crate::domain::generator::{
    BarGenerator, DEFAULT_BASE_PRICE, DEFAULT_MAX_POINTS, DEFAULT_PRICE_BAND, GeneratorConfig,
};
use crate::domain::resolution::ResolutionTable;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_RESOLUTIONS: [&str; 6] = ["1", "5", "15", "60", "240", "1D"];
pub const DEFAULT_SYMBOL_TYPE: &str = "crypto";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Everything the feed endpoints need, passed explicitly to each operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub generator: BarGenerator,
    pub supported_resolutions: Vec<String>,
    pub symbol_type: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            generator: BarGenerator::default(),
            supported_resolutions: DEFAULT_RESOLUTIONS.iter().map(|r| r.to_string()).collect(),
            symbol_type: DEFAULT_SYMBOL_TYPE.to_string(),
        }
    }
}

impl FeedSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FeedError> {
        let max_points = config.get_int("feed", "max_points", DEFAULT_MAX_POINTS as i64);
        let max_points = usize::try_from(max_points)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| FeedError::config_invalid("feed", "max_points", "must be positive"))?;

        let base_price = config.get_double("feed", "base_price", DEFAULT_BASE_PRICE);
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(FeedError::config_invalid(
                "feed",
                "base_price",
                "must be a positive number",
            ));
        }

        let price_band = config.get_int("feed", "price_band", DEFAULT_PRICE_BAND as i64);
        let price_band = u64::try_from(price_band)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| FeedError::config_invalid("feed", "price_band", "must be positive"))?;

        let resolutions = match config.get_string("feed", "named_resolutions") {
            Some(entries) => ResolutionTable::parse(&entries)
                .map_err(|reason| FeedError::config_invalid("feed", "named_resolutions", reason))?,
            None => ResolutionTable::default(),
        };

        let supported_resolutions = match config.get_string("feed", "supported_resolutions") {
            Some(list) => {
                let parsed: Vec<String> = list
                    .split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect();
                if parsed.is_empty() {
                    return Err(FeedError::config_invalid(
                        "feed",
                        "supported_resolutions",
                        "at least one resolution is required",
                    ));
                }
                parsed
            }
            None => DEFAULT_RESOLUTIONS.iter().map(|r| r.to_string()).collect(),
        };

        let symbol_type = config
            .get_string("feed", "symbol_type")
            .unwrap_or_else(|| DEFAULT_SYMBOL_TYPE.to_string());

        Ok(Self {
            generator: BarGenerator::new(
                GeneratorConfig {
                    max_points,
                    base_price,
                    price_band,
                },
                resolutions,
            ),
            supported_resolutions,
            symbol_type,
        })
    }
}

/// Where the client adapter finds the feed server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    /// `None` leaves hang detection to the caller.
    pub timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FeedError> {
        let base_url = config
            .get_string("client", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FeedError::config_invalid(
                "client",
                "base_url",
                "must start with http:// or https://",
            ));
        }

        let timeout_secs = config.get_int("client", "timeout_secs", 0);
        let timeout = match u64::try_from(timeout_secs) {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                return Err(FeedError::config_invalid(
                    "client",
                    "timeout_secs",
                    "must not be negative",
                ));
            }
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn with(mut self, section: &str, key: &str, value: &str) -> Self {
            self.0
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    #[test]
    fn empty_config_yields_defaults() {
        let settings = FeedSettings::from_config(&MapConfig::default()).unwrap();
        assert_eq!(settings, FeedSettings::default());
        assert_eq!(settings.generator.config.max_points, 2000);
        assert_eq!(
            settings.supported_resolutions,
            vec!["1", "5", "15", "60", "240", "1D"]
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = MapConfig::default()
            .with("feed", "max_points", "500")
            .with("feed", "supported_resolutions", "1, 60 ,1D,1W")
            .with("feed", "named_resolutions", "1D:86400,1W:604800")
            .with("feed", "symbol_type", "index");
        let settings = FeedSettings::from_config(&config).unwrap();
        assert_eq!(settings.generator.config.max_points, 500);
        assert_eq!(settings.supported_resolutions, vec!["1", "60", "1D", "1W"]);
        assert_eq!(settings.generator.period_secs("1W"), 604_800);
        assert_eq!(settings.symbol_type, "index");
    }

    #[test]
    fn zero_max_points_is_rejected() {
        let config = MapConfig::default().with("feed", "max_points", "0");
        let err = FeedSettings::from_config(&config).unwrap_err();
        assert!(matches!(err, FeedError::ConfigInvalid { ref key, .. } if key == "max_points"));
    }

    #[test]
    fn negative_price_band_is_rejected() {
        let config = MapConfig::default().with("feed", "price_band", "-1");
        assert!(FeedSettings::from_config(&config).is_err());
    }

    #[test]
    fn malformed_named_resolutions_are_rejected() {
        let config = MapConfig::default().with("feed", "named_resolutions", "1D=86400");
        let err = FeedSettings::from_config(&config).unwrap_err();
        assert!(
            matches!(err, FeedError::ConfigInvalid { ref key, .. } if key == "named_resolutions")
        );
    }

    #[test]
    fn blank_resolution_list_is_rejected() {
        let config = MapConfig::default().with("feed", "supported_resolutions", " , ");
        assert!(FeedSettings::from_config(&config).is_err());
    }

    #[test]
    fn client_defaults() {
        let client = ClientSettings::from_config(&MapConfig::default()).unwrap();
        assert_eq!(client, ClientSettings::default());
    }

    #[test]
    fn client_strips_trailing_slash_and_reads_timeout() {
        let config = MapConfig::default()
            .with("client", "base_url", "https://feed.example/udf/")
            .with("client", "timeout_secs", "5");
        let client = ClientSettings::from_config(&config).unwrap();
        assert_eq!(client.base_url, "https://feed.example/udf");
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn client_rejects_non_http_url() {
        let config = MapConfig::default().with("client", "base_url", "ftp://feed");
        assert!(ClientSettings::from_config(&config).is_err());
    }
}
