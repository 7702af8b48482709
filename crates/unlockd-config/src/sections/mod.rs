// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod key;
mod logging;

pub use key::{KeyConfig, KeyConfigLayer, DEFAULT_CHECK_DELAY_MS, DEFAULT_KEY_PATH};
pub use logging::{LoggingConfig, LoggingConfigLayer, DEFAULT_LOG_LEVEL};
