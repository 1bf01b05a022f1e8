// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-vendor (tenant) configuration: topics, identity codec, claims and blacklist.
//!
//! ```toml
//! [[vendors]]
//! company = "snapp"
//! allowed_access_types = ["pub", "sub"]
//!
//! [vendors.issuers]
//! "0" = "driver"
//! "1" = "passenger"
//!
//! [vendors.hashids.driver]
//! salt = "secret"
//! length = 15
//!
//! [[vendors.topics]]
//! type = "driver_location"
//! template = "{company}/driver/{identityToken}/location"
//! accesses = { driver = "publish" }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tollgate_topics::{AccessType, Audience, CodecParams, TopicDefinition};

use crate::error::ConfigError;

fn default_allowed_access_types() -> Vec<AccessType> {
	vec![AccessType::Subscribe, AccessType::Publish]
}

/// Configuration for one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorConfig {
	/// Tenant prefix every topic of this vendor starts with.
	pub company: String,
	#[serde(default = "default_allowed_access_types")]
	pub allowed_access_types: Vec<AccessType>,
	#[serde(default)]
	pub topics: Vec<TopicDefinition>,
	/// Maps issuer claim values to audiences.
	#[serde(default)]
	pub issuers: BTreeMap<String, Audience>,
	#[serde(default)]
	pub jwt: JwtConfig,
	/// Identity codec parameters keyed by audience name.
	#[serde(default)]
	pub hashids: BTreeMap<String, CodecParams>,
	#[serde(default)]
	pub blacklist: BlackListConfig,
}

impl VendorConfig {
	pub fn new(company: impl Into<String>) -> Self {
		Self {
			company: company.into(),
			allowed_access_types: default_allowed_access_types(),
			topics: Vec::new(),
			issuers: BTreeMap::new(),
			jwt: JwtConfig::default(),
			hashids: BTreeMap::new(),
			blacklist: BlackListConfig::default(),
		}
	}

	/// Codec parameters with their audience keys parsed.
	pub fn codec_params(&self) -> Result<Vec<(Audience, CodecParams)>, ConfigError> {
		self
			.hashids
			.iter()
			.map(|(name, params)| {
				let audience = name.parse::<Audience>().map_err(|e| ConfigError::InvalidValue {
					key: format!("vendors.{}.hashids", self.company),
					message: e.to_string(),
				})?;
				Ok((audience, params.clone()))
			})
			.collect()
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.company.is_empty() {
			return Err(ConfigError::Validation(
				"vendor company must not be empty".to_string(),
			));
		}
		if self.allowed_access_types.is_empty() {
			return Err(ConfigError::Validation(format!(
				"vendor '{}' allows no access types",
				self.company
			)));
		}
		for (audience, params) in self.codec_params()? {
			if params.salt.is_empty() {
				return Err(ConfigError::Validation(format!(
					"vendor '{}' has an empty hashids salt for {audience}",
					self.company
				)));
			}
		}
		Ok(())
	}
}

/// Names of the claims carrying issuer and subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
	#[serde(default = "default_iss_name")]
	pub iss_name: String,
	#[serde(default = "default_sub_name")]
	pub sub_name: String,
}

fn default_iss_name() -> String {
	"iss".to_string()
}

fn default_sub_name() -> String {
	"sub".to_string()
}

impl Default for JwtConfig {
	fn default() -> Self {
		Self {
			iss_name: default_iss_name(),
			sub_name: default_sub_name(),
		}
	}
}

/// Users whose requests are logged when they authenticate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackListConfig {
	#[serde(default)]
	pub issuer: Option<i64>,
	#[serde(default)]
	pub user_ids: Vec<u64>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use tollgate_topics::HashKind;

	const SAMPLE: &str = r#"
		company = "snapp"
		allowed_access_types = ["pub", "sub"]

		[issuers]
		"0" = "driver"
		"1" = "passenger"

		[hashids.driver]
		salt = "driver-salt"
		length = 15

		[blacklist]
		issuer = 0
		user_ids = [1, 2]

		[[topics]]
		type = "cab_event"
		template = "{company}/{audience}-event-{identityToken}"
		hash_kind = "secondary_hash"
		accesses = { driver = "sub", passenger = "sub" }
	"#;

	#[test]
	fn test_deserialize_full_vendor() {
		let vendor: VendorConfig = toml::from_str(SAMPLE).unwrap();
		assert_eq!(vendor.company, "snapp");
		assert_eq!(
			vendor.allowed_access_types,
			vec![AccessType::Publish, AccessType::Subscribe]
		);
		assert_eq!(vendor.issuers.get("1"), Some(&Audience::Passenger));
		assert_eq!(vendor.topics[0].hash_kind, HashKind::SecondaryHash);
		assert_eq!(vendor.blacklist.user_ids, vec![1, 2]);
		assert_eq!(vendor.jwt, JwtConfig::default());
		assert!(vendor.validate().is_ok());
	}

	#[test]
	fn test_defaults_for_minimal_vendor() {
		let vendor: VendorConfig = toml::from_str(r#"company = "box""#).unwrap();
		assert_eq!(vendor, VendorConfig::new("box"));
	}

	#[test]
	fn test_codec_params_rejects_unknown_audience() {
		let mut vendor = VendorConfig::new("snapp");
		vendor
			.hashids
			.insert("courier".to_string(), CodecParams::new("salt", 10));
		assert!(matches!(
			vendor.codec_params(),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_validate_rejects_empty_access_list() {
		let mut vendor = VendorConfig::new("snapp");
		vendor.allowed_access_types.clear();
		assert!(vendor.validate().is_err());
	}

	#[test]
	fn test_validate_rejects_empty_salt() {
		let mut vendor = VendorConfig::new("snapp");
		vendor
			.hashids
			.insert("driver".to_string(), CodecParams::new("", 10));
		let err = vendor.validate().unwrap_err();
		assert!(err.to_string().contains("empty hashids salt"));
	}
}
