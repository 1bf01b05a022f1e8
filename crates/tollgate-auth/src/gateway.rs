// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::sync::Arc;

use tollgate_config::GatewayConfig;
use tracing::{debug, info};

use crate::authenticator::Authenticator;
use crate::error::AuthError;
use crate::validator::Validator;

/// Per-vendor authenticators keyed by company.
#[derive(Debug, Clone)]
pub struct Gateway {
	vendors: BTreeMap<String, Arc<Authenticator>>,
	default: Arc<Authenticator>,
}

impl Gateway {
	pub fn from_config(config: &GatewayConfig, validator: Arc<dyn Validator>) -> Result<Self, AuthError> {
		let mut vendors = BTreeMap::new();
		for vendor in &config.vendors {
			let authenticator = Authenticator::from_vendor(vendor, Arc::clone(&validator))?;
			debug!(company = %vendor.company, topics = vendor.topics.len(), "vendor compiled");
			vendors.insert(vendor.company.clone(), Arc::new(authenticator));
		}

		let default = vendors
			.get(&config.default_vendor)
			.cloned()
			.ok_or_else(|| AuthError::UnknownVendor(config.default_vendor.clone()))?;

		info!(vendors = vendors.len(), default_vendor = %config.default_vendor, "gateway ready");
		Ok(Self { vendors, default })
	}

	/// Authenticator for `vendor`, or the default vendor's when the name is
	/// missing or unknown.
	pub fn authenticator(&self, vendor: Option<&str>) -> Arc<Authenticator> {
		match vendor {
			Some(name) => match self.vendors.get(name) {
				Some(authenticator) => Arc::clone(authenticator),
				None => {
					debug!(vendor = name, "unknown vendor, using default");
					Arc::clone(&self.default)
				}
			},
			None => Arc::clone(&self.default),
		}
	}

	pub fn default_vendor(&self) -> &str {
		self.default.company()
	}

	pub fn vendors(&self) -> impl Iterator<Item = &str> {
		self.vendors.keys().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::validator::UnavailableValidator;
	use tollgate_config::{LoggingConfig, VendorConfig};

	fn config() -> GatewayConfig {
		GatewayConfig {
			default_vendor: "snapp".to_string(),
			vendors: vec![VendorConfig::new("snapp"), VendorConfig::new("box")],
			logging: LoggingConfig::default(),
		}
	}

	#[test]
	fn selects_vendor_by_name() {
		let gateway = Gateway::from_config(&config(), Arc::new(UnavailableValidator)).unwrap();
		assert_eq!(gateway.authenticator(Some("box")).company(), "box");
		assert_eq!(gateway.authenticator(None).company(), "snapp");
		assert_eq!(gateway.default_vendor(), "snapp");
		assert_eq!(gateway.vendors().collect::<Vec<_>>(), vec!["box", "snapp"]);
	}

	#[test]
	fn unknown_vendor_falls_back_to_default() {
		let gateway = Gateway::from_config(&config(), Arc::new(UnavailableValidator)).unwrap();
		assert_eq!(gateway.authenticator(Some("unknown")).company(), "snapp");
	}

	#[test]
	fn missing_default_vendor_is_an_error() {
		let mut config = config();
		config.default_vendor = "ghost".to_string();
		let err = Gateway::from_config(&config, Arc::new(UnavailableValidator)).unwrap_err();
		assert!(matches!(err, AuthError::UnknownVendor(ref name) if name == "ghost"));
	}
}
