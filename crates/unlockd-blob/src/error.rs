// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for unlock record decoding.

use thiserror::Error;

/// Errors produced while decoding or validating an unlock record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
	/// Fewer bytes than a full record were available.
	#[error("short read: expected {expected} bytes, got {actual}")]
	ShortRead { expected: usize, actual: usize },

	/// The record does not start with the unlock record magic.
	#[error("bad magic: {0:#010x}")]
	BadMagic(u32),

	/// The record has an unsupported format version.
	#[error("unsupported version: {0:#010x}")]
	BadVersion(u32),

	/// A signature could not be parsed from its textual form.
	#[error("invalid signature: {0}")]
	InvalidSignature(String),

	/// Master key material could not be parsed from its textual form.
	#[error("invalid master key: {0}")]
	InvalidMasterKey(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_short_read_display() {
		let err = BlobError::ShortRead {
			expected: 48,
			actual: 12,
		};
		let msg = err.to_string();
		assert!(msg.contains("48"));
		assert!(msg.contains("12"));
	}

	#[test]
	fn test_bad_magic_display_is_hex() {
		let err = BlobError::BadMagic(0xdead_beef);
		assert_eq!(err.to_string(), "bad magic: 0xdeadbeef");
	}
}
