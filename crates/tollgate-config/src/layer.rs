// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::Deserialize;

use crate::sections::{LoggingConfigLayer, VendorConfig};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GatewayConfigLayer {
	#[serde(default)]
	pub default_vendor: Option<String>,
	/// Vendors are replaced wholesale by a higher-precedence layer, never merged.
	#[serde(default)]
	pub vendors: Option<Vec<VendorConfig>>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl GatewayConfigLayer {
	pub fn merge(&mut self, other: GatewayConfigLayer) {
		if other.default_vendor.is_some() {
			self.default_vendor = other.default_vendor;
		}
		if other.vendors.is_some() {
			self.vendors = other.vendors;
		}
		if let Some(overlay) = other.logging {
			self
				.logging
				.get_or_insert_with(LoggingConfigLayer::default)
				.merge(overlay);
		}
	}
}
