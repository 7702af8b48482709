// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where the unlock record bytes come from.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

pub trait KeySource: Send + Sync + fmt::Debug {
	/// Last modification time of the record at `path`.
	fn modified(&self, path: &Path) -> io::Result<SystemTime>;

	/// Reads up to `buf.len()` bytes from the start of the record and returns
	/// how many were read. Fewer than `buf.len()` means the record is short.
	fn read(&self, path: &Path, buf: &mut [u8]) -> io::Result<usize>;
}

/// Reads the record from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileKeySource;

impl KeySource for FileKeySource {
	fn modified(&self, path: &Path) -> io::Result<SystemTime> {
		fs::metadata(path)?.modified()
	}

	fn read(&self, path: &Path, buf: &mut [u8]) -> io::Result<usize> {
		let mut file = File::open(path)?;
		let mut filled = 0;
		while filled < buf.len() {
			match file.read(&mut buf[filled..]) {
				Ok(0) => break,
				Ok(n) => filled += n,
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e),
			}
		}
		Ok(filled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::TempDir;

	#[test]
	fn test_read_fills_buffer() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("record");
		fs::write(&path, [9u8; 64]).unwrap();

		let mut buf = [0u8; 48];
		let n = FileKeySource.read(&path, &mut buf).unwrap();
		assert_eq!(n, 48);
		assert!(buf.iter().all(|b| *b == 9));
	}

	#[test]
	fn test_read_reports_short_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("record");
		let mut file = File::create(&path).unwrap();
		file.write_all(&[1, 2, 3]).unwrap();

		let mut buf = [0u8; 48];
		assert_eq!(FileKeySource.read(&path, &mut buf).unwrap(), 3);
	}

	#[test]
	fn test_missing_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("absent");

		let err = FileKeySource.modified(&path).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
		let err = FileKeySource.read(&path, &mut [0u8; 4]).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}

	#[test]
	fn test_modified_tracks_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("record");
		let file = File::create(&path).unwrap();
		let stamp = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
		file.set_modified(stamp).unwrap();

		assert_eq!(FileKeySource.modified(&path).unwrap(), stamp);
	}
}
