// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tollgate_config::{GatewayConfig, LogFormat};
use tollgate_topics::AccessType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod version;

/// Tollgate - topic authorization gateway for MQTT brokers.
#[derive(Parser, Debug)]
#[command(
	name = "tollgate",
	about = "Topic authorization gateway for MQTT brokers",
	version
)]
struct Args {
	/// Config file (defaults to /etc/tollgate/config.toml)
	#[arg(long, global = true, env = "TOLLGATE_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Compile every vendor's topics and report unreachable patterns
	CheckConfig,

	/// Decide a single publish/subscribe request
	Authorize {
		/// Vendor to check against (defaults to the configured default vendor)
		#[arg(long)]
		vendor: Option<String>,

		/// Requested access: sub, pub (or 1, 2)
		#[arg(long)]
		access: AccessType,

		#[arg(long)]
		topic: String,

		/// Raw JWT whose claims are read without verification
		#[arg(long, conflicts_with_all = ["issuer", "subject"])]
		token: Option<String>,

		#[arg(long, requires = "subject")]
		issuer: Option<String>,

		#[arg(long, requires = "issuer")]
		subject: Option<String>,
	},

	/// Show version and build information
	Version,
}

fn main() -> ExitCode {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return ExitCode::SUCCESS;
	}

	dotenvy::dotenv().ok();

	match run(args) {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::from(2),
		Err(error) => {
			eprintln!("error: {error:#}");
			ExitCode::FAILURE
		}
	}
}

/// Returns whether the command's outcome was positive.
fn run(args: Args) -> anyhow::Result<bool> {
	let config = match args.config {
		Some(path) => tollgate_config::load_config_with_file(path)?,
		None => tollgate_config::load_config()?,
	};
	init_tracing(&config);

	match args.command {
		Command::CheckConfig => {
			print!("{}", commands::check_config(&config)?);
			Ok(true)
		}
		Command::Authorize {
			vendor,
			access,
			topic,
			token,
			issuer,
			subject,
		} => {
			let identity = commands::identity_from_flags(token, issuer, subject)?;
			let (allowed, line) =
				commands::authorize(&config, vendor.as_deref(), access, &topic, identity)?;
			println!("{line}");
			Ok(allowed)
		}
		Command::Version => Ok(true),
	}
}

fn init_tracing(config: &GatewayConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match config.logging.format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
			.init(),
		LogFormat::Pretty => registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init(),
	}

	tracing::debug!(
		vendors = config.vendors.len(),
		default_vendor = %config.default_vendor,
		"tollgate starting"
	);
}
