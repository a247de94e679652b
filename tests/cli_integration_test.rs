//! CLI integration tests.
//!
//! Tests cover:
//! - INI files on disk through `load_config` into feed and client settings
//! - `run_bars` writing CSV files, including the empty-window case
//! - Configuration errors surfacing as the right `FeedError` variants

use std::io::Write;
use std::path::PathBuf;

use synthfeed::cli::{self, WindowArgs};
use synthfeed::domain::error::FeedError;
use synthfeed::domain::settings::{ClientSettings, FeedSettings};

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[web]
listen = 0.0.0.0:9100

[feed]
max_points = 50
supported_resolutions = 1, 60, 1D, 1W
named_resolutions = 1D:86400, 1W:604800
symbol_type = stock

[client]
base_url = http://feed.local:9100/
timeout_secs = 10
"#;

fn window(symbol: &str, from: i64, to: i64, output: PathBuf) -> WindowArgs {
    WindowArgs {
        symbol: symbol.to_string(),
        resolution: "60".to_string(),
        from,
        to,
        config: None,
        output: Some(output),
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn ini_file_drives_feed_settings() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_config(file.path()).unwrap();
        let settings = FeedSettings::from_config(&config).unwrap();

        assert_eq!(settings.supported_resolutions, ["1", "60", "1D", "1W"]);
        assert_eq!(settings.symbol_type, "stock");
        assert_eq!(settings.generator.period_secs("1W"), 604_800);

        let bars = settings
            .generator
            .generate("X", "1", 0, 1_000_000, &mut rand::thread_rng());
        assert_eq!(bars.len(), 51);
        assert_eq!(bars.last().unwrap().time, 1_000_000 * 1000);
    }

    #[test]
    fn ini_file_drives_client_settings() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_config(file.path()).unwrap();
        let client = ClientSettings::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://feed.local:9100");
        assert_eq!(client.timeout, Some(std::time::Duration::from_secs(10)));
        assert_eq!(cli::listen_addr(&config).unwrap().port(), 9100);
    }

    #[test]
    fn missing_file_is_parse_error() {
        let err = cli::load_config(std::path::Path::new("/nonexistent/synthfeed.ini"))
            .unwrap_err();
        assert!(matches!(err, FeedError::ConfigParse { .. }));
    }

    #[test]
    fn bad_listen_address_is_invalid_config() {
        let file = write_temp_ini("[web]\nlisten = not-an-address\n");
        let config = cli::load_config(file.path()).unwrap();
        let err = cli::listen_addr(&config).unwrap_err();
        assert!(matches!(err, FeedError::ConfigInvalid { ref key, .. } if key == "listen"));
    }

    #[test]
    fn zero_max_points_is_rejected() {
        let file = write_temp_ini("[feed]\nmax_points = 0\n");
        let config = cli::load_config(file.path()).unwrap();
        let err = FeedSettings::from_config(&config).unwrap_err();
        assert!(matches!(err, FeedError::ConfigInvalid { ref key, .. } if key == "max_points"));
    }
}

mod bars_command_tests {
    use super::*;

    #[test]
    fn writes_csv_for_window() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("bars.csv");
        cli::run_bars(&window("BTCUSD", 0, 36_000, output.clone())).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "time,open,high,low,close,volume");
        assert_eq!(lines.len(), 12);
        assert!(lines[1].starts_with("0,"));
        assert!(lines[11].starts_with("36000000,"));
    }

    #[test]
    fn empty_window_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("bars.csv");
        cli::run_bars(&window("BTCUSD", 100, 100, output.clone())).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn config_file_caps_bar_count() {
        let ini = write_temp_ini("[feed]\nmax_points = 5\n");
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("capped.csv");
        let mut args = window("ETHUSD", 0, 36_000, output.clone());
        args.config = Some(ini.path().to_path_buf());
        cli::run_bars(&args).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 1 + 6);
    }

    #[test]
    fn invalid_config_stops_before_writing() {
        let ini = write_temp_ini("[feed]\nbase_price = -1\n");
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never.csv");
        let mut args = window("ETHUSD", 0, 36_000, output.clone());
        args.config = Some(ini.path().to_path_buf());

        let err = cli::run_bars(&args).unwrap_err();
        assert!(matches!(err, FeedError::ConfigInvalid { .. }));
        assert!(!output.exists());
    }
}
