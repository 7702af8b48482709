// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session- and process-scoped database objects.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::owner::{Process, Session};
use crate::referent::{Referent, ReferentError};

/// Hook run when the system is about to sleep.
pub trait SleepProcessing {
	fn sleep_processing(&self) {}
}

/// State shared by every database instance of a keychain within one session.
#[derive(Debug)]
pub struct DbCommon {
	session: Referent<Session>,
}

impl DbCommon {
	pub fn new(session: &Arc<Session>) -> Self {
		Self {
			session: Referent::attached(session),
		}
	}

	pub fn session(&self) -> Result<Arc<Session>, ReferentError> {
		self.session.get()
	}
}

impl SleepProcessing for DbCommon {
	fn sleep_processing(&self) {
		trace!("no sleep processing for common database state");
	}
}

/// Opaque handle to a key that a database holds a reference on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyHandle(pub u64);

impl fmt::Display for KeyHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "key#{}", self.0)
	}
}

/// A database opened by a client process.
pub struct Database {
	process: Referent<Process>,
	keys: Mutex<BTreeSet<KeyHandle>>,
}

impl Database {
	pub fn new(process: &Arc<Process>) -> Self {
		Self {
			process: Referent::attached(process),
			keys: Mutex::new(BTreeSet::new()),
		}
	}

	pub fn process(&self) -> Result<Arc<Process>, ReferentError> {
		self.process.get()
	}

	/// Record that this database references `key`. Returns false if it already did.
	pub fn add_reference(&self, key: KeyHandle) -> bool {
		let added = self.lock_keys().insert(key);
		debug!(key = %key, added, "database key reference added");
		added
	}

	/// Drop this database's reference on `key`. Returns false if there was none.
	pub fn release_key(&self, key: KeyHandle) -> bool {
		let removed = self.lock_keys().remove(&key);
		debug!(key = %key, removed, "database key reference released");
		removed
	}

	pub fn has_reference(&self, key: KeyHandle) -> bool {
		self.lock_keys().contains(&key)
	}

	/// Currently referenced keys in ascending order.
	pub fn references(&self) -> Vec<KeyHandle> {
		self.lock_keys().iter().copied().collect()
	}

	// The set is updated with single insert/remove calls, so a poisoned lock
	// still guards a consistent set.
	fn lock_keys(&self) -> std::sync::MutexGuard<'_, BTreeSet<KeyHandle>> {
		self.keys.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl SleepProcessing for Database {}

impl fmt::Debug for Database {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Database")
			.field("process", &self.process)
			.field("references", &self.references().len())
			.finish()
	}
}
