// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Tollgate authorization gateway.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Per-vendor sections: topic definitions, identity codec parameters, claim names
//! - Validation of cross-vendor rules before anything is compiled
//!
//! # Usage
//!
//! ```ignore
//! use tollgate_config::load_config;
//!
//! let config = load_config()?;
//! println!("default vendor: {}", config.default_vendor);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::GatewayConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH};

use std::collections::HashSet;

use tracing::{debug, info};

/// Fully resolved gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
	pub default_vendor: String,
	pub vendors: Vec<VendorConfig>,
	pub logging: LoggingConfig,
}

impl GatewayConfig {
	pub fn vendor(&self, company: &str) -> Option<&VendorConfig> {
		self.vendors.iter().find(|v| v.company == company)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TOLLGATE_*`)
/// 2. Config file (`/etc/tollgate/config.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<GatewayConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<GatewayConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<GatewayConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = GatewayConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: GatewayConfigLayer) -> Result<GatewayConfig, ConfigError> {
	let vendors = layer.vendors.unwrap_or_default();
	let logging = layer.logging.unwrap_or_default().finalize();

	let default_vendor = match layer.default_vendor {
		Some(name) => name,
		None => vendors
			.first()
			.map(|v| v.company.clone())
			.ok_or_else(|| ConfigError::Validation("no vendors configured".to_string()))?,
	};

	let config = GatewayConfig {
		default_vendor,
		vendors,
		logging,
	};
	validate_config(&config)?;

	info!(
		default_vendor = %config.default_vendor,
		vendors = config.vendors.len(),
		topics = config.vendors.iter().map(|v| v.topics.len()).sum::<usize>(),
		log_level = %config.logging.level,
		"Gateway configuration loaded"
	);

	Ok(config)
}

/// Validate cross-vendor configuration rules.
fn validate_config(config: &GatewayConfig) -> Result<(), ConfigError> {
	let mut companies = HashSet::new();
	for vendor in &config.vendors {
		vendor.validate()?;
		if !companies.insert(vendor.company.as_str()) {
			return Err(ConfigError::Validation(format!(
				"vendor '{}' is configured more than once",
				vendor.company
			)));
		}
	}

	if config.vendor(&config.default_vendor).is_none() {
		return Err(ConfigError::Validation(format!(
			"default vendor '{}' is not configured",
			config.default_vendor
		)));
	}

	Ok(())
}
