// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Write-once weak link from an object to its owner.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use thiserror::Error;
use tracing::error;

use crate::owner::OwnerKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferentError {
	#[error("invalid referent: no {kind} attached")]
	Unattached { kind: &'static str },

	#[error("invalid referent: {kind} has been destroyed")]
	Stale { kind: &'static str },

	#[error("referent already attached to a {kind}")]
	AlreadyAttached { kind: &'static str },
}

/// Weak back-reference to an owner of kind `O`.
///
/// Set at most once. Holding a `Referent` never keeps the owner alive.
pub struct Referent<O: OwnerKind> {
	link: OnceLock<Weak<O>>,
}

impl<O: OwnerKind> Referent<O> {
	pub const fn new() -> Self {
		Self {
			link: OnceLock::new(),
		}
	}

	/// Construct already attached to `owner`.
	pub fn attached(owner: &Arc<O>) -> Self {
		let referent = Self::new();
		let _ = referent.link.set(Arc::downgrade(owner));
		referent
	}

	pub fn attach(&self, owner: &Arc<O>) -> Result<(), ReferentError> {
		self
			.link
			.set(Arc::downgrade(owner))
			.map_err(|_| ReferentError::AlreadyAttached { kind: O::KIND })
	}

	pub fn is_attached(&self) -> bool {
		self.link.get().is_some()
	}

	/// Look the owner up.
	///
	/// A failure here means the surrounding lifecycle let a database outlive
	/// its owner (or never attached it), so it is always logged at error level.
	pub fn get(&self) -> Result<Arc<O>, ReferentError> {
		let Some(weak) = self.link.get() else {
			error!(owner_kind = O::KIND, "owner lookup on unattached referent");
			return Err(ReferentError::Unattached { kind: O::KIND });
		};

		weak.upgrade().ok_or_else(|| {
			error!(owner_kind = O::KIND, "owner lookup on stale referent");
			ReferentError::Stale { kind: O::KIND }
		})
	}
}

impl<O: OwnerKind> Default for Referent<O> {
	fn default() -> Self {
		Self::new()
	}
}

impl<O: OwnerKind> fmt::Debug for Referent<O> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = match self.link.get() {
			None => "unattached",
			Some(weak) if weak.strong_count() == 0 => "stale",
			Some(_) => "live",
		};
		f.debug_struct("Referent")
			.field("kind", &O::KIND)
			.field("state", &state)
			.finish()
	}
}
