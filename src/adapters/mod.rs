//! Concrete adapter implementations for ports.

pub mod csv_adapter;
#[cfg(feature = "client")]
pub mod feed_client;
pub mod file_config_adapter;
#[cfg(feature = "web")]
pub mod web;
