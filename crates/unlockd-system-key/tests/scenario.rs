// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end behaviour of the cache against real files.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use unlockd_blob::{Signature, UnlockBlob};
use unlockd_system_key::{
	FileKeySource, KeyState, ManualClock, Probe, ProbeError, SystemKeyConfig, SystemUnlockKey,
};

const SIG_A: Signature = Signature::new([0xa1; 16]);
const SIG_B: Signature = Signature::new([0xb2; 16]);
const DELAY: Duration = Duration::from_secs(1);

fn write_record(path: &Path, signature: Signature, mtime_secs: u64) {
	let mut file = File::create(path).unwrap();
	file.write_all(&UnlockBlob::new(signature, [0x42; 24]).to_bytes()[..])
		.unwrap();
	file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs))
		.unwrap();
}

fn cache_for(path: &Path) -> (SystemUnlockKey, Arc<ManualClock>) {
	let clock = Arc::new(ManualClock::new());
	let key = SystemUnlockKey::with_parts(
		path,
		SystemKeyConfig::new().with_check_delay(DELAY),
		clock.clone(),
		Arc::new(FileKeySource),
	);
	(key, clock)
}

#[test]
fn delete_then_restore_lifecycle() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("SystemKey");
	write_record(&path, SIG_A, 1_000);
	let (key, clock) = cache_for(&path);

	assert!(key.matches(&SIG_A));
	assert!(!key.matches(&SIG_B));

	fs::remove_file(&path).unwrap();
	assert!(key.matches(&SIG_A), "still inside the check delay");

	clock.advance(DELAY);
	assert!(!key.matches(&SIG_A));
	assert_eq!(key.state(), KeyState::Invalid);

	write_record(&path, SIG_A, 2_000);
	clock.advance(DELAY);
	assert!(key.matches(&SIG_A));
	assert_eq!(key.state(), KeyState::Valid);
}

#[test]
fn rewrite_with_preserved_mtime_is_not_noticed() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("SystemKey");
	write_record(&path, SIG_A, 1_000);
	let (key, clock) = cache_for(&path);
	assert!(key.matches(&SIG_A));

	write_record(&path, SIG_B, 1_000);
	clock.advance(DELAY);
	assert!(matches!(key.revalidate(), Probe::Unchanged));
	assert!(key.matches(&SIG_A));

	File::options()
		.write(true)
		.open(&path)
		.unwrap()
		.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_001))
		.unwrap();
	clock.advance(DELAY);
	assert!(key.matches(&SIG_B));
	assert!(!key.matches(&SIG_A));
}

#[test]
fn truncated_file_is_rejected() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("SystemKey");
	fs::write(&path, &UnlockBlob::new(SIG_A, [0x42; 24]).to_bytes()[..20]).unwrap();
	let (key, _clock) = cache_for(&path);

	assert!(matches!(key.revalidate(), Probe::Invalid(_)));
	assert!(!key.matches(&SIG_A));
	assert!(key.key().is_none());
}

#[test]
fn unreadable_path_is_rejected() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("SystemKey");
	fs::create_dir(&path).unwrap();
	let (key, _clock) = cache_for(&path);

	assert!(matches!(key.revalidate(), Probe::Error(ProbeError::Read(_))));
	assert!(!key.matches(&SIG_A));
}

#[test]
fn default_constructor_reads_real_files() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("SystemKey");
	write_record(&path, SIG_B, 1_000);

	let key = SystemUnlockKey::new(&path);
	assert_eq!(key.path(), path.as_path());
	assert!(key.matches(&SIG_B));
	assert_eq!(key.key().unwrap().material().expose(), &[0x42; 24]);
}
