//! # Storage Layer
//!
//! Reads feature descriptors and configuration from disk. Everything here
//! produces plain domain values; resolution itself never touches the
//! filesystem.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Features | YAML descriptor | `{feature_dir}/{name}/info.yaml` or `{feature_dir}/{name}.yaml` |
//! | Config | TOML | `~/.config/garden-feat/config.toml` or `--config` |
//!
//! ## Key Types
//!
//! - [`FeatureStore`] - Loads a feature directory into a [`Catalog`](crate::domain::Catalog)
//! - [`Config`] - User configuration

mod loader;
mod config;

pub use loader::{parse_feature, FeatureStore, LoadError, DESCRIPTOR_FILE};
pub use config::{Config, ConfigError, DEFAULT_FEATURE_DIR};
