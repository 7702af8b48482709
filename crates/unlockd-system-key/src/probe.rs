// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outcome types for a single revalidation of the unlock record.

use std::io;

use thiserror::Error;
use unlockd_blob::BlobError;

/// What the cache currently believes about the unlock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
	/// No probe has completed yet.
	#[default]
	Unknown,
	Valid,
	Invalid,
}

impl KeyState {
	pub fn is_valid(self) -> bool {
		matches!(self, KeyState::Valid)
	}
}

/// Failure to observe the record at all, as opposed to observing a bad one.
#[derive(Debug, Error)]
pub enum ProbeError {
	#[error("stat failed: {0}")]
	Stat(#[source] io::Error),

	#[error("read failed: {0}")]
	Read(#[source] io::Error),

	#[error("key source panicked: {0}")]
	Fault(String),
}

/// Result of [`SystemUnlockKey::revalidate`](crate::SystemUnlockKey::revalidate).
#[derive(Debug)]
pub enum Probe {
	/// Still inside the check delay; the cached answer was returned untouched.
	Throttled { valid: bool },
	/// The file was stat'ed and its modification time matched the cached one.
	Unchanged,
	/// The record was read and passed validation.
	Valid,
	/// The record was read but is not a usable unlock record.
	Invalid(BlobError),
	/// The record could not be stat'ed or read.
	Error(ProbeError),
}

impl Probe {
	pub fn is_valid(&self) -> bool {
		match self {
			Probe::Throttled { valid } => *valid,
			Probe::Unchanged | Probe::Valid => true,
			Probe::Invalid(_) | Probe::Error(_) => false,
		}
	}

	/// Whether this probe touched the filesystem.
	pub fn probed(&self) -> bool {
		!matches!(self, Probe::Throttled { .. })
	}
}

/// Counters of filesystem work done by one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeStats {
	pub stat_calls: u64,
	pub body_reads: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_probe_validity() {
		assert!(Probe::Throttled { valid: true }.is_valid());
		assert!(!Probe::Throttled { valid: false }.is_valid());
		assert!(Probe::Unchanged.is_valid());
		assert!(Probe::Valid.is_valid());
		assert!(!Probe::Invalid(BlobError::BadVersion(7)).is_valid());
		assert!(!Probe::Error(ProbeError::Fault("boom".into())).is_valid());
	}

	#[test]
	fn test_probed() {
		assert!(!Probe::Throttled { valid: true }.probed());
		assert!(Probe::Unchanged.probed());
	}

	#[test]
	fn test_key_state_default_is_unknown() {
		assert_eq!(KeyState::default(), KeyState::Unknown);
		assert!(!KeyState::Unknown.is_valid());
		assert!(!KeyState::Invalid.is_valid());
		assert!(KeyState::Valid.is_valid());
	}

	#[test]
	fn test_probe_error_display() {
		let err = ProbeError::Stat(io::Error::from(io::ErrorKind::NotFound));
		assert!(err.to_string().starts_with("stat failed:"));
	}
}
