// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use unlockd_blob::{KeyHeader, MasterKey, Signature, UnlockBlob};
use unlockd_system_key::{KeyState, Probe, SystemUnlockKey};

pub fn check(key: &SystemUnlockKey, signature: &Signature) -> bool {
	let matched = key.matches(signature);
	debug!(path = %key.path().display(), %signature, matched, "checked system unlock record");
	matched
}

/// Atomically replace the record at `path` with a fresh one.
///
/// The record is written to a temporary file in the same directory and renamed
/// over the target, so readers see either the old record or the new one.
pub fn write_record(path: &Path, signature: Signature, master_key: &MasterKey) -> Result<()> {
	let blob = UnlockBlob::new(signature, *master_key.expose());
	let dir = path
		.parent()
		.filter(|p| !p.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));

	let mut file = NamedTempFile::new_in(dir)
		.with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		file.as_file()
			.set_permissions(std::fs::Permissions::from_mode(0o600))
			.context("failed to restrict record permissions")?;
	}
	file.write_all(&blob.to_bytes()[..])
		.context("failed to write record")?;
	file.as_file().sync_all().context("failed to sync record")?;
	file.persist(path)
		.with_context(|| format!("failed to move record into place at {}", path.display()))?;

	info!(path = %path.display(), %signature, "wrote system unlock record");
	Ok(())
}

/// Human-readable description of the record. Never includes key material.
#[derive(Debug)]
pub struct Report {
	pub path: PathBuf,
	pub state: KeyState,
	pub outcome: String,
	pub signature: Option<Signature>,
	pub header: Option<KeyHeader>,
}

pub fn inspect(key: &SystemUnlockKey) -> Report {
	let outcome = describe(&key.revalidate());
	Report {
		path: key.path().to_path_buf(),
		state: key.state(),
		outcome,
		signature: key.signature(),
		header: key.key().map(|raw| *raw.header()),
	}
}

fn describe(probe: &Probe) -> String {
	match probe {
		Probe::Throttled { .. } => "throttled".to_string(),
		Probe::Unchanged => "unchanged".to_string(),
		Probe::Valid => "loaded".to_string(),
		Probe::Invalid(err) => format!("rejected: {err}"),
		Probe::Error(err) => format!("unavailable: {err}"),
	}
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = match self.state {
			KeyState::Unknown => "unknown",
			KeyState::Valid => "valid",
			KeyState::Invalid => "invalid",
		};
		writeln!(f, "path:      {}", self.path.display())?;
		writeln!(f, "state:     {state}")?;
		writeln!(f, "probe:     {}", self.outcome)?;
		if let Some(signature) = &self.signature {
			writeln!(f, "signature: {signature}")?;
		}
		if let Some(header) = &self.header {
			writeln!(f, "algorithm: {} ({} bits)", header.algorithm, header.size_bits)?;
		}
		Ok(())
	}
}
