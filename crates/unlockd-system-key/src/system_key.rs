// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Instant, SystemTime};

use tracing::{debug, trace, warn};
use unlockd_blob::{RawKey, Signature, UnlockBlob, BLOB_LEN};
use zeroize::Zeroizing;

use crate::clock::{Clock, SystemClock};
use crate::config::SystemKeyConfig;
use crate::probe::{KeyState, Probe, ProbeError, ProbeStats};
use crate::source::{FileKeySource, KeySource};

#[derive(Debug, Default)]
struct KeyCache {
	state: KeyState,
	/// Present only while `state` is `Valid`.
	blob: Option<UnlockBlob>,
	modified: Option<SystemTime>,
	last_check: Option<Instant>,
	stats: ProbeStats,
}

impl KeyCache {
	fn accept(&mut self, blob: UnlockBlob, modified: SystemTime) {
		self.blob = Some(blob);
		self.modified = Some(modified);
		self.state = KeyState::Valid;
	}

	fn invalidate(&mut self) {
		self.blob = None;
		self.modified = None;
		self.state = KeyState::Invalid;
	}

	fn reset(&mut self) {
		self.blob = None;
		self.modified = None;
		self.state = KeyState::Unknown;
		self.last_check = None;
	}

	fn valid_blob(&self) -> Option<&UnlockBlob> {
		if self.state.is_valid() {
			self.blob.as_ref()
		} else {
			None
		}
	}
}

/// In-memory copy of the system unlock record, revalidated lazily against the
/// file it was loaded from.
///
/// All methods take `&self`; the cache is safe to share across threads. A
/// revalidation holds the internal lock for its whole duration, so callers
/// never observe a half-updated record.
#[derive(Debug)]
pub struct SystemUnlockKey {
	path: PathBuf,
	config: SystemKeyConfig,
	clock: Arc<dyn Clock>,
	source: Arc<dyn KeySource>,
	cache: Mutex<KeyCache>,
}

impl SystemUnlockKey {
	/// Cache backed by the real filesystem and clock, with the default check delay.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self::with_config(path, SystemKeyConfig::default())
	}

	pub fn with_config(path: impl Into<PathBuf>, config: SystemKeyConfig) -> Self {
		Self::with_parts(path, config, Arc::new(SystemClock), Arc::new(FileKeySource))
	}

	pub fn with_parts(
		path: impl Into<PathBuf>,
		config: SystemKeyConfig,
		clock: Arc<dyn Clock>,
		source: Arc<dyn KeySource>,
	) -> Self {
		Self {
			path: path.into(),
			config,
			clock,
			source,
			cache: Mutex::new(KeyCache::default()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn config(&self) -> &SystemKeyConfig {
		&self.config
	}

	/// Bring the cache up to date with the record on disk, subject to the
	/// check delay, and report what happened.
	pub fn revalidate(&self) -> Probe {
		let mut cache = self.lock_cache();
		self.revalidate_locked(&mut cache)
	}

	/// True iff the record is valid after revalidation and its signature equals
	/// `signature`.
	pub fn matches(&self, signature: &Signature) -> bool {
		let mut cache = self.lock_cache();
		if !self.revalidate_locked(&mut cache).is_valid() {
			return false;
		}
		cache
			.valid_blob()
			.is_some_and(|blob| blob.signature() == signature)
	}

	/// The unlock key carried by the record, if the record is valid after
	/// revalidation.
	pub fn key(&self) -> Option<RawKey> {
		let mut cache = self.lock_cache();
		if !self.revalidate_locked(&mut cache).is_valid() {
			return None;
		}
		cache.valid_blob().map(UnlockBlob::raw_key)
	}

	/// Signature of the cached record, if valid after revalidation.
	pub fn signature(&self) -> Option<Signature> {
		let mut cache = self.lock_cache();
		if !self.revalidate_locked(&mut cache).is_valid() {
			return None;
		}
		cache.valid_blob().map(|blob| *blob.signature())
	}

	/// Current belief about the record. Does not probe.
	pub fn state(&self) -> KeyState {
		self.lock_cache().state
	}

	pub fn stats(&self) -> ProbeStats {
		self.lock_cache().stats
	}

	fn revalidate_locked(&self, cache: &mut KeyCache) -> Probe {
		let now = self.clock.now();
		if let Some(last) = cache.last_check {
			if now.saturating_duration_since(last) < self.config.check_delay {
				return Probe::Throttled {
					valid: cache.state.is_valid(),
				};
			}
		}
		cache.last_check = Some(now);

		cache.stats.stat_calls += 1;
		let modified = match shielded(|| self.source.modified(&self.path), ProbeError::Stat) {
			Ok(modified) => modified,
			Err(err) => return self.unavailable(cache, err),
		};

		if cache.state.is_valid() && cache.modified == Some(modified) {
			trace!(path = %self.path.display(), "system unlock record unchanged");
			return Probe::Unchanged;
		}

		cache.stats.body_reads += 1;
		let mut buf = Zeroizing::new([0u8; BLOB_LEN]);
		let read = match shielded(|| self.source.read(&self.path, &mut buf[..]), ProbeError::Read) {
			Ok(read) => read.min(BLOB_LEN),
			Err(err) => return self.unavailable(cache, err),
		};

		match UnlockBlob::parse(&buf[..read]) {
			Ok(blob) => {
				debug!(
					path = %self.path.display(),
					signature = %blob.signature(),
					"loaded system unlock record"
				);
				cache.accept(blob, modified);
				Probe::Valid
			}
			Err(err) => {
				debug!(path = %self.path.display(), error = %err, "rejected system unlock record");
				cache.invalidate();
				Probe::Invalid(err)
			}
		}
	}

	fn unavailable(&self, cache: &mut KeyCache, err: ProbeError) -> Probe {
		match &err {
			ProbeError::Fault(_) => {
				warn!(path = %self.path.display(), error = %err, "system unlock record probe faulted")
			}
			_ => debug!(path = %self.path.display(), error = %err, "system unlock record unavailable"),
		}
		cache.invalidate();
		Probe::Error(err)
	}

	fn lock_cache(&self) -> MutexGuard<'_, KeyCache> {
		match self.cache.lock() {
			Ok(guard) => guard,
			Err(poisoned) => {
				warn!(path = %self.path.display(), "system unlock cache lock poisoned, discarding cached record");
				self.cache.clear_poison();
				let mut guard = poisoned.into_inner();
				guard.reset();
				guard
			}
		}
	}
}

/// Run a key source call, turning both I/O errors and panics into a
/// [`ProbeError`].
fn shielded<T>(
	call: impl FnOnce() -> io::Result<T>,
	on_io: fn(io::Error) -> ProbeError,
) -> Result<T, ProbeError> {
	match panic::catch_unwind(AssertUnwindSafe(call)) {
		Ok(result) => result.map_err(on_io),
		Err(payload) => Err(ProbeError::Fault(panic_message(payload.as_ref()))),
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_string()
	}
}
