// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Topic authorization for a single vendor.
//!
//! A request is checked in a fixed order and the first failing step decides
//! the outcome:
//!
//! 1. the requested access type must be one the vendor allows
//! 2. the claims must carry an issuer
//! 3. the claims must carry a subject
//! 4. the topic must match a declared pattern
//! 5. the issuer's audience must be granted the access on that pattern, and
//!    identity-scoped patterns must be owned by the subject

use std::sync::Arc;

use tollgate_config::VendorConfig;
use tollgate_topics::{
	has_access, AccessType, AllowedAccessTypes, Audience, IdentityCodec, Registry, SelfTopicValidator,
};
use tracing::{debug, instrument};

use crate::claims::Claims;
use crate::decision::{Decision, DenyReason};
use crate::error::AuthError;
use crate::issuer::IssuerMap;

/// Decides whether a caller may publish or subscribe on a topic.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TopicAuthorizer {
	registry: Arc<Registry>,
	codec: Arc<IdentityCodec>,
	allowed: AllowedAccessTypes,
	issuers: IssuerMap,
}

impl TopicAuthorizer {
	pub fn new(registry: Arc<Registry>, codec: Arc<IdentityCodec>) -> Self {
		Self {
			registry,
			codec,
			allowed: AllowedAccessTypes::default(),
			issuers: IssuerMap::default(),
		}
	}

	pub fn with_allowed_access_types(mut self, allowed: AllowedAccessTypes) -> Self {
		self.allowed = allowed;
		self
	}

	pub fn with_issuers(mut self, issuers: IssuerMap) -> Self {
		self.issuers = issuers;
		self
	}

	/// Compiles the vendor's topics and codec parameters.
	pub fn from_vendor(vendor: &VendorConfig) -> Result<Self, AuthError> {
		let registry = Registry::new(&vendor.company, &vendor.topics).map_err(|source| {
			AuthError::Topics {
				company: vendor.company.clone(),
				source,
			}
		})?;
		let codec = IdentityCodec::new(vendor.codec_params()?);

		Ok(Self::new(Arc::new(registry), Arc::new(codec))
			.with_allowed_access_types(AllowedAccessTypes::new(
				vendor.allowed_access_types.iter().copied(),
			))
			.with_issuers(IssuerMap::new(vendor.issuers.clone())))
	}

	pub fn company(&self) -> &str {
		self.registry.company()
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	pub fn audience_of(&self, issuer: &str) -> Option<Audience> {
		self.issuers.resolve(issuer)
	}

	/// True iff `topic` is the caller's own topic.
	pub fn validates_self(&self, topic: &str, issuer: &str, subject: &str) -> bool {
		match self.issuers.resolve(issuer) {
			Some(audience) => {
				SelfTopicValidator::new(&self.registry, &self.codec).validates_self(topic, audience, subject)
			}
			None => false,
		}
	}

	#[instrument(
		level = "debug",
		skip(self, claims),
		fields(company = %self.registry.company(), access = %requested)
	)]
	pub fn authorize(&self, requested: AccessType, topic: &str, claims: &Claims) -> Decision {
		if !self.allowed.validate(requested) {
			return deny(DenyReason::InvalidAccessType(requested));
		}

		let Some(issuer) = claims.issuer() else {
			return deny(DenyReason::IssuerMissing);
		};
		let Some(subject) = claims.subject() else {
			return deny(DenyReason::SubjectMissing);
		};

		let Some(matched) = self.registry.lookup(topic) else {
			return deny(DenyReason::TopicNotRecognized {
				topic: topic.to_string(),
			});
		};
		let topic_type = matched.topic.topic_type();

		let not_allowed = || {
			deny(DenyReason::TopicNotAllowed {
				issuer: issuer.to_string(),
				subject: subject.to_string(),
				access_type: requested,
				topic: topic.to_string(),
				topic_type: topic_type.to_string(),
			})
		};

		let Some(audience) = self.issuers.resolve(issuer) else {
			debug!(issuer, "issuer maps to no audience");
			return not_allowed();
		};

		if !has_access(matched.topic, audience, requested) {
			return not_allowed();
		}

		if matched.topic.requires_ownership()
			&& !SelfTopicValidator::new(&self.registry, &self.codec)
				.validates_match(&matched, topic, audience, subject)
		{
			return not_allowed();
		}

		debug!(topic_type, %audience, "access granted");
		Decision::Allow {
			topic_type: topic_type.to_string(),
		}
	}
}

fn deny(reason: DenyReason) -> Decision {
	debug!(%reason, "access denied");
	Decision::Deny(reason)
}
