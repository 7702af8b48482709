// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the unlockd tools.
//!
//! This crate provides:
//! - Layered configuration from defaults, a TOML file and the environment
//! - Consistent environment variable naming (`UNLOCKD_*`)
//! - Validation of the resolved values
//!
//! # Usage
//!
//! ```ignore
//! use unlockd_config::load_config;
//!
//! let config = load_config()?;
//! println!("system key at {}", config.key.path.display());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::UnlockdConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Longest accepted check delay: one day.
pub const MAX_CHECK_DELAY_MS: u64 = 86_400_000;

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnlockdConfig {
	pub key: KeyConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`UNLOCKD_*`)
/// 2. Config file (`/etc/unlockd/unlockd.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<UnlockdConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<UnlockdConfig, ConfigError> {
	let mut merged = UnlockdConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path in place of the system one.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<UnlockdConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<UnlockdConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = UnlockdConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize a merged layer into resolved config.
pub fn finalize(layer: UnlockdConfigLayer) -> Result<UnlockdConfig, ConfigError> {
	let key = layer.key.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&key)?;

	info!(
		key_path = %key.path.display(),
		check_delay_ms = key.check_delay_ms,
		log_level = %logging.level,
		json_logs = logging.json,
		"configuration loaded"
	);

	Ok(UnlockdConfig { key, logging })
}

fn validate_config(key: &KeyConfig) -> Result<(), ConfigError> {
	if key.path.as_os_str().is_empty() {
		return Err(ConfigError::Validation("key.path must not be empty".to_string()));
	}
	if key.check_delay_ms == 0 || key.check_delay_ms > MAX_CHECK_DELAY_MS {
		return Err(ConfigError::Validation(format!(
			"key.check_delay_ms must be between 1 and {MAX_CHECK_DELAY_MS}, got {}",
			key.check_delay_ms
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::tests::{clear_env, ENV_MUTEX};
	use proptest::prelude::*;
	use std::path::PathBuf;
	use tempfile::TempDir;

	#[test]
	fn test_defaults() {
		let config = finalize(UnlockdConfigLayer::default()).unwrap();
		assert_eq!(config, UnlockdConfig::default());
		assert_eq!(config.key.path, PathBuf::from(DEFAULT_KEY_PATH));
	}

	#[test]
	fn test_zero_delay_rejected() {
		let layer = UnlockdConfigLayer {
			key: Some(KeyConfigLayer {
				path: None,
				check_delay_ms: Some(0),
			}),
			logging: None,
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("check_delay_ms"));
	}

	#[test]
	fn test_empty_path_rejected() {
		let layer = UnlockdConfigLayer {
			key: Some(KeyConfigLayer {
				path: Some(PathBuf::new()),
				check_delay_ms: None,
			}),
			logging: None,
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_env_overrides_file() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_env();
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("unlockd.toml");
		std::fs::write(
			&path,
			"[key]\npath = \"/from/file\"\ncheck_delay_ms = 500\n\n[logging]\nlevel = \"debug\"\n",
		)
		.unwrap();
		std::env::set_var("UNLOCKD_KEY_CHECK_DELAY_MS", "750");

		let result = load_config_with_file(&path);
		clear_env();

		let config = result.unwrap();
		assert_eq!(config.key.path, PathBuf::from("/from/file"));
		assert_eq!(config.key.check_delay_ms, 750);
		assert_eq!(config.logging.level, "debug");
		assert!(!config.logging.json);
	}

	#[test]
	fn test_load_config_from_env_only() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_env();
		std::env::set_var("UNLOCKD_KEY_PATH", "/env/key");

		let result = load_config_from_env();
		clear_env();

		let config = result.unwrap();
		assert_eq!(config.key.path, PathBuf::from("/env/key"));
		assert_eq!(config.key.check_delay_ms, DEFAULT_CHECK_DELAY_MS);
	}

	proptest! {
		#[test]
		fn prop_delay_bounds(delay in any::<u64>()) {
			let layer = UnlockdConfigLayer {
				key: Some(KeyConfigLayer { path: None, check_delay_ms: Some(delay) }),
				logging: None,
			};
			let accepted = finalize(layer).is_ok();
			prop_assert_eq!(accepted, delay > 0 && delay <= MAX_CHECK_DELAY_MS);
		}
	}
}
