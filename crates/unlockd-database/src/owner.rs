// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Owning contexts a database can be attached to.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// A type that can be the target of a [`Referent`](crate::Referent).
pub trait OwnerKind: Send + Sync + 'static {
	/// Human-readable owner kind, used in errors and logs.
	const KIND: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for SessionId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A login session.
#[derive(Debug)]
pub struct Session {
	id: SessionId,
}

impl Session {
	pub fn new() -> Arc<Self> {
		Arc::new(Self { id: SessionId::new() })
	}

	pub fn id(&self) -> SessionId {
		self.id
	}
}

impl OwnerKind for Session {
	const KIND: &'static str = "session";
}

/// A client process running inside a session.
#[derive(Debug)]
pub struct Process {
	pid: u32,
	session: Arc<Session>,
}

impl Process {
	pub fn new(pid: u32, session: Arc<Session>) -> Arc<Self> {
		Arc::new(Self { pid, session })
	}

	pub fn pid(&self) -> u32 {
		self.pid
	}

	pub fn session(&self) -> &Arc<Session> {
		&self.session
	}
}

impl OwnerKind for Process {
	const KIND: &'static str = "process";
}
