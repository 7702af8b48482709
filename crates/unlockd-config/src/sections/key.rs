// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! System unlock record configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY_PATH: &str = "/var/db/SystemKey";
pub const DEFAULT_CHECK_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyConfigLayer {
	#[serde(default)]
	pub path: Option<PathBuf>,
	#[serde(default)]
	pub check_delay_ms: Option<u64>,
}

impl KeyConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.path.is_some() {
			self.path = other.path;
		}
		if other.check_delay_ms.is_some() {
			self.check_delay_ms = other.check_delay_ms;
		}
	}

	pub fn finalize(self) -> KeyConfig {
		KeyConfig {
			path: self.path.unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_PATH)),
			check_delay_ms: self.check_delay_ms.unwrap_or(DEFAULT_CHECK_DELAY_MS),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyConfig {
	/// Location of the system unlock record.
	pub path: PathBuf,
	/// Minimum interval between filesystem probes of the record.
	pub check_delay_ms: u64,
}

impl Default for KeyConfig {
	fn default() -> Self {
		Self {
			path: PathBuf::from(DEFAULT_KEY_PATH),
			check_delay_ms: DEFAULT_CHECK_DELAY_MS,
		}
	}
}

impl KeyConfig {
	pub fn check_delay(&self) -> Duration {
		Duration::from_millis(self.check_delay_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = KeyConfig::default();
		assert_eq!(config.path, PathBuf::from("/var/db/SystemKey"));
		assert_eq!(config.check_delay(), Duration::from_secs(1));
	}

	#[test]
	fn test_layer_finalize_defaults() {
		assert_eq!(KeyConfigLayer::default().finalize(), KeyConfig::default());
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = KeyConfigLayer {
			path: Some(PathBuf::from("/a")),
			check_delay_ms: Some(10),
		};
		base.merge(KeyConfigLayer {
			path: None,
			check_delay_ms: Some(250),
		});

		assert_eq!(base.path, Some(PathBuf::from("/a")));
		assert_eq!(base.check_delay_ms, Some(250));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: KeyConfigLayer = toml::from_str("check_delay_ms = 5000").unwrap();
		assert_eq!(layer.path, None);
		assert_eq!(layer.finalize().check_delay(), Duration::from_secs(5));
	}

	#[test]
	fn test_serde_roundtrip() {
		let config = KeyConfig {
			path: PathBuf::from("/tmp/SystemKey"),
			check_delay_ms: 42,
		};
		let text = toml::to_string(&config).unwrap();
		let parsed: KeyConfig = toml::from_str(&text).unwrap();
		assert_eq!(parsed, config);
	}
}
