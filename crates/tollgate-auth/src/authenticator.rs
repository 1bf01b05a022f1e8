// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Broker hook entry points for one vendor: connect-time authentication and
//! per-topic ACL checks.

use std::sync::Arc;

use tollgate_config::{JwtConfig, VendorConfig};
use tollgate_topics::AccessType;
use tracing::{instrument, warn};

use crate::authorizer::TopicAuthorizer;
use crate::blacklist::BlackList;
use crate::claims::Claims;
use crate::decision::{Decision, DenyReason};
use crate::error::AuthError;
use crate::validator::{gateway_headers, Payload, Validator};

pub struct Authenticator {
	authorizer: TopicAuthorizer,
	claim_names: JwtConfig,
	validator: Arc<dyn Validator>,
	blacklist: BlackList,
}

impl std::fmt::Debug for Authenticator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Authenticator")
			.field("company", &self.authorizer.company())
			.field("claim_names", &self.claim_names)
			.finish_non_exhaustive()
	}
}

impl Authenticator {
	pub fn new(authorizer: TopicAuthorizer, validator: Arc<dyn Validator>) -> Self {
		Self {
			authorizer,
			claim_names: JwtConfig::default(),
			validator,
			blacklist: BlackList::default(),
		}
	}

	pub fn with_claim_names(mut self, claim_names: JwtConfig) -> Self {
		self.claim_names = claim_names;
		self
	}

	pub fn with_blacklist(mut self, blacklist: BlackList) -> Self {
		self.blacklist = blacklist;
		self
	}

	pub fn from_vendor(vendor: &VendorConfig, validator: Arc<dyn Validator>) -> Result<Self, AuthError> {
		Ok(Self::new(TopicAuthorizer::from_vendor(vendor)?, validator)
			.with_claim_names(vendor.jwt.clone())
			.with_blacklist(BlackList::from_config(&vendor.blacklist)))
	}

	pub fn company(&self) -> &str {
		self.authorizer.company()
	}

	pub fn authorizer(&self) -> &TopicAuthorizer {
		&self.authorizer
	}

	/// Verifies a connecting client's token with the validator.
	///
	/// Blacklisted users are logged and still let through.
	#[instrument(level = "debug", skip(self, token), fields(company = %self.company()))]
	pub async fn auth(&self, token: &str) -> Result<Payload, AuthError> {
		let headers = gateway_headers();
		let payload = self
			.validator
			.validate(&headers, &format!("bearer {token}"))
			.await?;

		if self.blacklist.is_blacklisted(payload.user_id, payload.iss) {
			warn!(
				iat = payload.iat,
				aud = %payload.aud,
				iss = payload.iss,
				sub = %payload.sub,
				user_id = payload.user_id,
				email = %payload.email,
				exp = payload.exp,
				locale = %payload.locale,
				sid = %payload.sid,
				"blacklisted user is requesting"
			);
		}

		Ok(payload)
	}

	/// ACL hook: reads the token's claims without verifying them and
	/// authorizes the topic request.
	pub fn acl(&self, requested: AccessType, token: &str, topic: &str) -> Decision {
		match Claims::from_unverified_jwt(token, &self.claim_names) {
			Ok(claims) => self.authorizer.authorize(requested, topic, &claims),
			Err(error) => Decision::Deny(DenyReason::InvalidClaims(error.to_string())),
		}
	}
}
