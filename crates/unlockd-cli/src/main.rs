// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `unlockd` - inspect, check and provision the system unlock record.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unlockd_blob::{MasterKey, Signature};
use unlockd_config::{LoggingConfig, UnlockdConfig};
use unlockd_system_key::{SystemKeyConfig, SystemUnlockKey};

mod commands;

#[derive(Parser, Debug)]
#[command(
	name = "unlockd",
	about = "System keychain unlock record tool",
	version
)]
struct Cli {
	/// Config file to use instead of /etc/unlockd/unlockd.toml
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Log filter used when RUST_LOG is unset (e.g. "debug")
	#[arg(long, global = true, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Emit logs as JSON lines
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Exit 0 if the record is valid and carries SIGNATURE, 1 otherwise
	Check {
		/// Database signature, 32 hex digits
		#[arg(long)]
		signature: Signature,

		#[arg(long, value_name = "PATH")]
		key_path: Option<PathBuf>,
	},

	/// Write a fresh record
	Write {
		/// Database signature, 32 hex digits
		#[arg(long)]
		signature: Signature,

		/// 3DES master key, 48 hex digits
		#[arg(long, env = "UNLOCKD_MASTER_KEY", hide_env_values = true)]
		master_key: MasterKey,

		#[arg(long, value_name = "PATH")]
		key_path: Option<PathBuf>,
	},

	/// Describe the record without revealing the key
	Inspect {
		#[arg(long, value_name = "PATH")]
		key_path: Option<PathBuf>,
	},
}

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();

	let mut config = match &cli.config {
		Some(path) => unlockd_config::load_config_with_file(path),
		None => unlockd_config::load_config(),
	}
	.context("failed to load configuration")?;
	if let Some(level) = cli.log_level {
		config.logging.level = level;
	}
	if cli.json_logs {
		config.logging.json = true;
	}

	init_tracing(&config.logging);

	match cli.command {
		Command::Check {
			signature,
			key_path,
		} => {
			let key = open_key(&config, key_path);
			let matched = commands::check(&key, &signature);
			println!("{}", if matched { "match" } else { "no match" });
			Ok(if matched {
				ExitCode::SUCCESS
			} else {
				ExitCode::FAILURE
			})
		}
		Command::Write {
			signature,
			master_key,
			key_path,
		} => {
			let path = key_path.unwrap_or_else(|| config.key.path.clone());
			commands::write_record(&path, signature, &master_key)?;
			println!("wrote {}", path.display());
			Ok(ExitCode::SUCCESS)
		}
		Command::Inspect { key_path } => {
			let key = open_key(&config, key_path);
			print!("{}", commands::inspect(&key));
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn open_key(config: &UnlockdConfig, key_path: Option<PathBuf>) -> SystemUnlockKey {
	let path = key_path.unwrap_or_else(|| config.key.path.clone());
	SystemUnlockKey::with_config(
		path,
		SystemKeyConfig::new().with_check_delay(config.key.check_delay()),
	)
}

fn init_tracing(logging: &LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
	let registry = tracing_subscriber::registry().with(filter);

	if logging.json {
		registry
			.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_parse_check() {
		let cli = Cli::try_parse_from([
			"unlockd",
			"--json-logs",
			"check",
			"--signature",
			"000102030405060708090a0b0c0d0e0f",
			"--key-path",
			"/tmp/SystemKey",
		])
		.unwrap();

		assert!(cli.json_logs);
		match cli.command {
			Command::Check {
				signature,
				key_path,
			} => {
				assert_eq!(signature.as_bytes()[15], 0x0f);
				assert_eq!(key_path, Some(PathBuf::from("/tmp/SystemKey")));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_rejects_short_signature() {
		let result = Cli::try_parse_from(["unlockd", "check", "--signature", "abcd"]);
		assert!(result.is_err());
	}

	#[test]
	fn test_parse_write_requires_master_key_length() {
		let result = Cli::try_parse_from([
			"unlockd",
			"write",
			"--signature",
			"000102030405060708090a0b0c0d0e0f",
			"--master-key",
			"00",
		]);
		assert!(result.is_err());
	}
}
