// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Staleness-checked cache of the system keychain unlock record.
//!
//! [`SystemUnlockKey`] keeps an in-memory copy of the unlock record stored at a
//! fixed path and answers "does the cached record carry this signature?"
//! without touching the filesystem on every call:
//!
//! 1. Within `check_delay` of the last probe, the cached answer is returned.
//! 2. Otherwise the file is stat'ed. If the record is already valid and the
//!    modification time is unchanged, the cached answer stands.
//! 3. Otherwise the record is re-read and re-validated.
//!
//! Every failure (missing file, short read, bad header, an I/O error, even a
//! panic inside the key source) collapses to "no valid key". Nothing is ever
//! returned to the caller as an error.
//!
//! # Example
//!
//! ```no_run
//! use unlockd_blob::Signature;
//! use unlockd_system_key::SystemUnlockKey;
//!
//! let key = SystemUnlockKey::new("/var/db/SystemKey");
//! let signature: Signature = "00112233445566778899aabbccddeeff".parse().unwrap();
//! if key.matches(&signature) {
//!     // unlock the system keychain
//! }
//! ```

pub mod clock;
pub mod config;
pub mod probe;
pub mod source;
pub mod system_key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SystemKeyConfig, DEFAULT_CHECK_DELAY};
pub use probe::{KeyState, Probe, ProbeError, ProbeStats};
pub use source::{FileKeySource, KeySource};
pub use system_key::SystemUnlockKey;
