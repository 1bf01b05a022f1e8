// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Self-topic validation (anti-spoofing).
//!
//! A client may only act on the topic rendered from its *own* verified
//! identity. The validator rebuilds that topic from the caller's audience and
//! subject and compares it byte-for-byte with the requested topic:
//!
//! ```text
//! topic ─► classify ─► fields(company, audience, peer, token, segments) ─► render ─► == topic?
//! ```
//!
//! Segment values (e.g. a routing node) are taken from the matcher's named
//! captures, so extraction can never disagree with classification.

use tracing::debug;

use crate::codec::{secondary_hash, IdentityCodec};
use crate::error::CodecError;
use crate::registry::{Registry, TopicMatch};
use crate::template::TopicFields;
use crate::types::{Audience, HashKind};

#[derive(Debug, Clone, Copy)]
pub struct SelfTopicValidator<'a> {
	registry: &'a Registry,
	codec: &'a IdentityCodec,
}

impl<'a> SelfTopicValidator<'a> {
	pub fn new(registry: &'a Registry, codec: &'a IdentityCodec) -> Self {
		Self { registry, codec }
	}

	/// True iff `topic` is the topic `subject` of `audience` legitimately owns.
	pub fn validates_self(&self, topic: &str, audience: Audience, subject: &str) -> bool {
		match self.registry.lookup(topic) {
			Some(matched) => self.validates_match(&matched, topic, audience, subject),
			None => false,
		}
	}

	/// Same as [`SelfTopicValidator::validates_self`] for an already classified topic.
	pub fn validates_match(
		&self,
		matched: &TopicMatch<'_>,
		topic: &str,
		audience: Audience,
		subject: &str,
	) -> bool {
		let token = match self.identity_token(matched.topic.hash_kind(), subject, audience) {
			Ok(token) => token,
			Err(error) => {
				debug!(%error, %audience, topic_type = matched.topic.topic_type(), "identity token rejected");
				return false;
			}
		};

		let mut fields = TopicFields::new(self.registry.company())
			.with_audience(audience)
			.with_identity_token(token);
		fields.segments = matched.segments.clone();

		let rendered = matched.topic.render(&fields);
		!rendered.is_empty() && rendered == topic
	}

	/// Derives the identity token a topic of `hash_kind` must embed.
	pub fn identity_token(
		&self,
		hash_kind: HashKind,
		subject: &str,
		audience: Audience,
	) -> Result<String, CodecError> {
		let id = self.codec.decode(subject, audience)?;
		match hash_kind {
			HashKind::Identity => self.codec.encode(id, audience),
			HashKind::SecondaryHash => Ok(secondary_hash(id)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::CodecParams;
	use crate::topic::TopicDefinition;
	use crate::types::AccessType;
	use proptest::prelude::*;

	fn codec() -> IdentityCodec {
		IdentityCodec::new([
			(Audience::Driver, CodecParams::new("driver-salt", 15)),
			(Audience::Passenger, CodecParams::new("passenger-salt", 15)),
		])
	}

	fn registry() -> Registry {
		Registry::new(
			"snapp",
			&[
				TopicDefinition::new("cab_event", "{company}/{audience}-event-{identityToken}")
					.with_hash_kind(HashKind::SecondaryHash)
					.with_access(Audience::Passenger, AccessType::Subscribe),
				TopicDefinition::new("driver_location", "{company}/driver-location-{identityToken}")
					.with_access(Audience::Driver, AccessType::Publish),
				TopicDefinition::new("node_call_entry", "{company}/{audience}/{identityToken}/call/node/{node}")
					.with_access(Audience::Driver, AccessType::PublishSubscribe),
			],
		)
		.unwrap()
	}

	#[test]
	fn owner_passes_and_other_token_fails() {
		let (registry, codec) = (registry(), codec());
		let validator = SelfTopicValidator::new(&registry, &codec);
		let subject = codec.encode(123, Audience::Driver).unwrap();

		let own = format!("snapp/driver-location-{subject}");
		assert!(validator.validates_self(&own, Audience::Driver, &subject));
		assert!(!validator.validates_self("snapp/driver-location-zzz999", Audience::Driver, &subject));
	}

	#[test]
	fn secondary_hash_topics_embed_the_digest() {
		let (registry, codec) = (registry(), codec());
		let validator = SelfTopicValidator::new(&registry, &codec);
		let subject = codec.encode(42, Audience::Passenger).unwrap();

		let topic = format!("snapp/passenger-event-{}", secondary_hash(42));
		assert!(validator.validates_self(&topic, Audience::Passenger, &subject));

		let raw = format!("snapp/passenger-event-{subject}");
		assert!(!validator.validates_self(&raw, Audience::Passenger, &subject));
	}

	#[test]
	fn segments_come_from_the_topic() {
		let (registry, codec) = (registry(), codec());
		let validator = SelfTopicValidator::new(&registry, &codec);
		let subject = codec.encode(7, Audience::Driver).unwrap();

		let topic = format!("snapp/driver/{subject}/call/node/eu-west-1");
		assert!(validator.validates_self(&topic, Audience::Driver, &subject));
	}

	#[test]
	fn short_topic_is_denied_not_panicking() {
		let (registry, codec) = (registry(), codec());
		let validator = SelfTopicValidator::new(&registry, &codec);
		let subject = codec.encode(7, Audience::Driver).unwrap();

		assert!(!validator.validates_self(&format!("snapp/driver/{subject}/call/node/"), Audience::Driver, &subject));
		assert!(!validator.validates_self("snapp", Audience::Driver, &subject));
	}

	#[test]
	fn wrong_audience_fails() {
		let (registry, codec) = (registry(), codec());
		let validator = SelfTopicValidator::new(&registry, &codec);
		let subject = codec.encode(7, Audience::Driver).unwrap();

		let topic = format!("snapp/driver/{subject}/call/node/n1");
		assert!(!validator.validates_self(&topic, Audience::Passenger, &subject));
	}

	#[test]
	fn undecodable_subject_fails() {
		let (registry, codec) = (registry(), codec());
		let validator = SelfTopicValidator::new(&registry, &codec);
		assert!(!validator.validates_self("snapp/driver-location-abc123", Audience::Driver, "abc123"));
	}

	proptest! {
		#[test]
		fn distinct_identities_cannot_share_a_topic(a in 0u64..1_000_000, b in 0u64..1_000_000) {
			prop_assume!(a != b);
			let (registry, codec) = (registry(), codec());
			let validator = SelfTopicValidator::new(&registry, &codec);
			let subject_a = codec.encode(a, Audience::Driver).unwrap();
			let subject_b = codec.encode(b, Audience::Driver).unwrap();

			let topic = format!("snapp/driver-location-{subject_a}");
			prop_assert!(validator.validates_self(&topic, Audience::Driver, &subject_a));
			prop_assert!(!validator.validates_self(&topic, Audience::Driver, &subject_b));
		}
	}
}
