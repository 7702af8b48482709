// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw key view of an unlock record's master key.

use std::fmt;

use crate::blob::{MasterKey, MASTER_KEY_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBlobType {
	Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBlobFormat {
	OctetString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
	SessionKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
	/// Triple-DES, three independent keys, encrypt-decrypt-encrypt.
	TripleDes3KeyEde,
}

impl KeyAlgorithm {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::TripleDes3KeyEde => "3des-3key-ede",
		}
	}
}

impl fmt::Display for KeyAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
	Any,
}

/// Descriptive header attached to raw key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHeader {
	pub blob_type: KeyBlobType,
	pub format: KeyBlobFormat,
	pub class: KeyClass,
	pub algorithm: KeyAlgorithm,
	pub attributes: u32,
	pub usage: KeyUsage,
	pub size_bits: u32,
}

impl KeyHeader {
	/// Header for the system keychain unlock key: a raw 3DES session key.
	pub const fn system_unlock() -> Self {
		Self {
			blob_type: KeyBlobType::Raw,
			format: KeyBlobFormat::OctetString,
			class: KeyClass::SessionKey,
			algorithm: KeyAlgorithm::TripleDes3KeyEde,
			attributes: 0,
			usage: KeyUsage::Any,
			size_bits: (MASTER_KEY_LEN * 8) as u32,
		}
	}
}

/// Master key material plus its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKey {
	header: KeyHeader,
	material: MasterKey,
}

impl RawKey {
	pub fn system_unlock(material: MasterKey) -> Self {
		Self {
			header: KeyHeader::system_unlock(),
			material,
		}
	}

	pub fn header(&self) -> &KeyHeader {
		&self.header
	}

	pub fn material(&self) -> &MasterKey {
		&self.material
	}
}
