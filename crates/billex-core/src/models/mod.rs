//! Data models: configuration, text lines and output records.

pub mod config;
pub mod line;
pub mod record;
