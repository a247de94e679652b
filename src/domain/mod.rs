//! Core domain types and logic: bars, resolutions, the generator and the feed
//! operations built on it.

pub mod bar;
pub mod error;
pub mod feed;
pub mod generator;
pub mod protocol;
pub mod resolution;
pub mod settings;
