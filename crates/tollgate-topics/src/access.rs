// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access decision engine.
//!
//! Two independent checks guard every request:
//!
//! 1. **Deployment allow-list**: [`AllowedAccessTypes`] rejects access types
//!    the deployment never serves, before any topic rule is consulted
//! 2. **Per-topic table**: [`has_access`] looks up the audience's declared
//!    access on the matched topic
//!
//! Both are pure functions of their inputs.

use tracing::instrument;

use crate::topic::CompiledTopic;
use crate::types::{AccessType, Audience};

/// Evaluates whether `audience` may perform `requested` on `topic`.
#[instrument(
	level = "debug",
	skip(topic),
	fields(topic_type = %topic.topic_type())
)]
pub fn has_access(topic: &CompiledTopic, audience: Audience, requested: AccessType) -> bool {
	grants(topic.access_for(audience), requested)
}

/// Whether a declared access satisfies a requested one.
///
/// `PublishSubscribe` is a wildcard for publish and subscribe requests. A
/// missing declaration never grants.
pub fn grants(declared: Option<AccessType>, requested: AccessType) -> bool {
	match declared {
		Some(AccessType::PublishSubscribe) => true,
		Some(declared) => declared == requested,
		None => false,
	}
}

/// Access types a deployment is willing to serve at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedAccessTypes(Vec<AccessType>);

impl AllowedAccessTypes {
	pub fn new(allowed: impl IntoIterator<Item = AccessType>) -> Self {
		Self(allowed.into_iter().collect())
	}

	pub fn validate(&self, requested: AccessType) -> bool {
		self.0.contains(&requested)
	}

	pub fn as_slice(&self) -> &[AccessType] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Default for AllowedAccessTypes {
	fn default() -> Self {
		Self::new([AccessType::Subscribe, AccessType::Publish])
	}
}
