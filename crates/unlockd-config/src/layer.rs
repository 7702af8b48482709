// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{KeyConfigLayer, LoggingConfigLayer};

/// One partially-specified configuration, as produced by a single source.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UnlockdConfigLayer {
	#[serde(default)]
	pub key: Option<KeyConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl UnlockdConfigLayer {
	/// Fields set in `other` win.
	pub fn merge(&mut self, other: UnlockdConfigLayer) {
		merge_section(&mut self.key, other.key, KeyConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = UnlockdConfigLayer::default();
		base.merge(UnlockdConfigLayer {
			key: Some(KeyConfigLayer {
				path: Some(PathBuf::from("/k")),
				check_delay_ms: None,
			}),
			logging: None,
		});

		assert_eq!(base.key.unwrap().path, Some(PathBuf::from("/k")));
		assert!(base.logging.is_none());
	}

	#[test]
	fn test_merge_keeps_unset_fields() {
		let mut base: UnlockdConfigLayer = toml::from_str(
			r#"
			[key]
			path = "/file"
			check_delay_ms = 100
			"#,
		)
		.unwrap();
		base.merge(UnlockdConfigLayer {
			key: Some(KeyConfigLayer {
				path: None,
				check_delay_ms: Some(200),
			}),
			logging: None,
		});

		let key = base.key.unwrap();
		assert_eq!(key.path, Some(PathBuf::from("/file")));
		assert_eq!(key.check_delay_ms, Some(200));
	}

	#[test]
	fn test_unknown_sections_are_ignored() {
		let layer: UnlockdConfigLayer = toml::from_str("[other]\nvalue = 1\n").unwrap();
		assert_eq!(layer, UnlockdConfigLayer::default());
	}
}
