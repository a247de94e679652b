//! synthfeed: a synthetic OHLCV market-data feed speaking a UDF-style protocol.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations (HTTP server, HTTP client, INI config, CSV export) in
//! [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
