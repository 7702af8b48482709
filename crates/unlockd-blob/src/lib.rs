// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! System unlock record format.
//!
//! An unlock record is a single fixed-size structure stored verbatim on disk:
//!
//! | Offset | Size | Field      |
//! |--------|------|------------|
//! | 0      | 4    | magic      |
//! | 4      | 4    | version    |
//! | 8      | 16   | signature  |
//! | 24     | 24   | master key |
//!
//! Integers are big-endian. The signature is an opaque comparison tag for the
//! keychain the record unlocks; it is never verified cryptographically. The
//! master key is a raw three-key triple-DES key and is redacted from all
//! formatted output.
//!
//! # Example
//!
//! ```
//! use unlockd_blob::{Signature, UnlockBlob};
//!
//! let signature = Signature::new([7u8; 16]);
//! let blob = UnlockBlob::new(signature, [1u8; 24]);
//! let bytes = blob.to_bytes();
//!
//! let parsed = UnlockBlob::parse(bytes.as_slice()).unwrap();
//! assert_eq!(parsed.signature(), &signature);
//! assert!(format!("{parsed:?}").contains(unlockd_blob::REDACTED));
//! ```

pub mod blob;
pub mod error;
pub mod key;
pub mod signature;

pub use blob::{MasterKey, UnlockBlob, BLOB_LEN, BLOB_MAGIC, BLOB_VERSION, MASTER_KEY_LEN};
pub use error::BlobError;
pub use key::{KeyAlgorithm, KeyBlobFormat, KeyBlobType, KeyClass, KeyHeader, KeyUsage, RawKey};
pub use signature::{Signature, SIGNATURE_LEN};

/// The redaction placeholder used wherever key material would be printed.
pub const REDACTED: &str = "[REDACTED]";
