// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fixed-layout unlock record and its structural integrity check.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use crate::error::BlobError;
use crate::key::RawKey;
use crate::signature::{Signature, SIGNATURE_LEN};
use crate::REDACTED;

/// Magic number shared by all security record blobs.
pub const BLOB_MAGIC: u32 = 0xFADE_0711;

/// The only record version this crate understands.
pub const BLOB_VERSION: u32 = 0x0000_0100;

/// Length of the raw master key (three 8-byte DES keys).
pub const MASTER_KEY_LEN: usize = 24;

/// Total on-disk size of an unlock record.
pub const BLOB_LEN: usize = 4 + 4 + SIGNATURE_LEN + MASTER_KEY_LEN;

const SIGNATURE_OFFSET: usize = 8;
const MASTER_KEY_OFFSET: usize = SIGNATURE_OFFSET + SIGNATURE_LEN;

/// Raw master key octets, zeroized on drop.
///
/// There is no `Deref`; callers must go through [`MasterKey::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey(Zeroizing<[u8; MASTER_KEY_LEN]>);

impl MasterKey {
	pub fn new(bytes: [u8; MASTER_KEY_LEN]) -> Self {
		Self(Zeroizing::new(bytes))
	}

	pub fn expose(&self) -> &[u8; MASTER_KEY_LEN] {
		&self.0
	}
}

impl fmt::Debug for MasterKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("MasterKey").field(&REDACTED).finish()
	}
}

impl FromStr for MasterKey {
	type Err = BlobError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = Zeroizing::new(
			hex::decode(s.trim()).map_err(|e| BlobError::InvalidMasterKey(e.to_string()))?,
		);
		let array: [u8; MASTER_KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
			BlobError::InvalidMasterKey(format!(
				"expected {MASTER_KEY_LEN} bytes, got {}",
				bytes.len()
			))
		})?;
		Ok(Self::new(array))
	}
}

/// A decoded unlock record.
///
/// Decoding never validates; call [`UnlockBlob::is_valid`] (or use
/// [`UnlockBlob::parse`]) before trusting the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct UnlockBlob {
	magic: u32,
	version: u32,
	signature: Signature,
	master_key: MasterKey,
}

impl UnlockBlob {
	/// Build a current-version record.
	pub fn new(signature: Signature, master_key: [u8; MASTER_KEY_LEN]) -> Self {
		Self {
			magic: BLOB_MAGIC,
			version: BLOB_VERSION,
			signature,
			master_key: MasterKey::new(master_key),
		}
	}

	/// Decode a record from the first [`BLOB_LEN`] bytes of `bytes`.
	///
	/// Trailing bytes are ignored, mirroring a single fixed-size read of a
	/// longer file.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlobError> {
		if bytes.len() < BLOB_LEN {
			return Err(BlobError::ShortRead {
				expected: BLOB_LEN,
				actual: bytes.len(),
			});
		}

		let magic = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
		let version = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
		let signature = Signature::from_slice(&bytes[SIGNATURE_OFFSET..MASTER_KEY_OFFSET])?;

		let mut master_key = [0u8; MASTER_KEY_LEN];
		master_key.copy_from_slice(&bytes[MASTER_KEY_OFFSET..BLOB_LEN]);
		let master_key = MasterKey::new(master_key);

		Ok(Self {
			magic,
			version,
			signature,
			master_key,
		})
	}

	/// Decode and validate in one step.
	pub fn parse(bytes: &[u8]) -> Result<Self, BlobError> {
		let blob = Self::from_bytes(bytes)?;
		blob.validate()?;
		Ok(blob)
	}

	/// Structural check: magic and version must both be current.
	pub fn validate(&self) -> Result<(), BlobError> {
		if self.magic != BLOB_MAGIC {
			return Err(BlobError::BadMagic(self.magic));
		}
		if self.version != BLOB_VERSION {
			return Err(BlobError::BadVersion(self.version));
		}
		Ok(())
	}

	pub fn is_valid(&self) -> bool {
		self.validate().is_ok()
	}

	pub fn to_bytes(&self) -> Zeroizing<[u8; BLOB_LEN]> {
		let mut out = Zeroizing::new([0u8; BLOB_LEN]);
		out[0..4].copy_from_slice(&self.magic.to_be_bytes());
		out[4..SIGNATURE_OFFSET].copy_from_slice(&self.version.to_be_bytes());
		out[SIGNATURE_OFFSET..MASTER_KEY_OFFSET].copy_from_slice(self.signature.as_bytes());
		out[MASTER_KEY_OFFSET..BLOB_LEN].copy_from_slice(self.master_key.expose());
		out
	}

	pub fn magic(&self) -> u32 {
		self.magic
	}

	pub fn version(&self) -> u32 {
		self.version
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	pub fn master_key(&self) -> &MasterKey {
		&self.master_key
	}

	/// The master key wrapped with the system unlock key header.
	pub fn raw_key(&self) -> RawKey {
		RawKey::system_unlock(self.master_key.clone())
	}
}

impl fmt::Debug for UnlockBlob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UnlockBlob")
			.field("magic", &format_args!("{:#010x}", self.magic))
			.field("version", &format_args!("{:#010x}", self.version))
			.field("signature", &self.signature)
			.field("master_key", &self.master_key)
			.finish()
	}
}
