// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Owner back-references for database objects.
//!
//! Databases are scoped to a longer-lived owner (a [`Session`] or a
//! [`Process`]) but never own it. A [`Referent`] records that relationship as a
//! weak link: the database can look its owner up, and the lookup fails with a
//! [`ReferentError`] once the owner is gone instead of keeping it alive.

pub mod database;
pub mod owner;
pub mod referent;

pub use database::{Database, DbCommon, KeyHandle, SleepProcessing};
pub use owner::{OwnerKind, Process, Session, SessionId};
pub use referent::{Referent, ReferentError};
