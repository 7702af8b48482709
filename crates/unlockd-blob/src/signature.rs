// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keychain signature carried by an unlock record.

use std::fmt;
use std::str::FromStr;

use crate::error::BlobError;

/// Width of a keychain signature in bytes.
pub const SIGNATURE_LEN: usize = 16;

/// Fixed-width signature identifying the keychain an unlock record belongs to.
///
/// Used purely for equality: two signatures match iff every byte matches.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
	pub const fn new(bytes: [u8; SIGNATURE_LEN]) -> Self {
		Self(bytes)
	}

	/// Build a signature from a slice that must be exactly [`SIGNATURE_LEN`] long.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, BlobError> {
		let array: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
			BlobError::InvalidSignature(format!(
				"expected {SIGNATURE_LEN} bytes, got {}",
				bytes.len()
			))
		})?;
		Ok(Self(array))
	}

	pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
		&self.0
	}
}

impl From<[u8; SIGNATURE_LEN]> for Signature {
	fn from(bytes: [u8; SIGNATURE_LEN]) -> Self {
		Self(bytes)
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode(self.0))
	}
}

impl fmt::Debug for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Signature({self})")
	}
}

impl FromStr for Signature {
	type Err = BlobError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = hex::decode(s.trim()).map_err(|e| BlobError::InvalidSignature(e.to_string()))?;
		Self::from_slice(&bytes)
	}
}
