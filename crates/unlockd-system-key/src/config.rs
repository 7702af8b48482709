// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

/// Minimum interval between filesystem probes of the unlock record.
pub const DEFAULT_CHECK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemKeyConfig {
	/// How long a probe result is trusted before the file is looked at again.
	pub check_delay: Duration,
}

impl Default for SystemKeyConfig {
	fn default() -> Self {
		Self {
			check_delay: DEFAULT_CHECK_DELAY,
		}
	}
}

impl SystemKeyConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_check_delay(mut self, check_delay: Duration) -> Self {
		self.check_delay = check_delay;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_check_delay() {
		assert_eq!(SystemKeyConfig::default().check_delay, Duration::from_secs(1));
	}

	#[test]
	fn test_builder() {
		let config = SystemKeyConfig::new().with_check_delay(Duration::from_millis(10));
		assert_eq!(config.check_delay, Duration::from_millis(10));
	}
}
