// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered, tenant-scoped collection of compiled topics.
//!
//! Classification is first-match-wins in declaration order. Overlapping
//! patterns are legal but detected at construction and logged, because the
//! later pattern can never be selected for the topics the earlier one claims.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::error::TopicError;
use crate::template::{Placeholder, TopicFields};
use crate::topic::{CompiledTopic, TopicDefinition};
use crate::types::Audience;

/// A classified topic: the compiled pattern plus captured segment values.
#[derive(Debug, Clone)]
pub struct TopicMatch<'a> {
	pub topic: &'a CompiledTopic,
	pub segments: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Registry {
	company: String,
	topics: Vec<CompiledTopic>,
}

impl Registry {
	/// Compiles `definitions` for tenant `company`.
	///
	/// Fails on the first malformed template, unknown audience, or duplicate
	/// topic type.
	pub fn new(company: impl Into<String>, definitions: &[TopicDefinition]) -> Result<Self, TopicError> {
		let company = company.into();
		let mut seen = HashSet::new();
		let mut topics = Vec::with_capacity(definitions.len());

		for definition in definitions {
			if !seen.insert(definition.topic_type.as_str()) {
				return Err(TopicError::DuplicateType(definition.topic_type.clone()));
			}
			topics.push(CompiledTopic::compile(definition, &company)?);
		}

		let registry = Self { company, topics };
		for (earlier, later) in registry.shadowed_patterns() {
			warn!(
				company = %registry.company,
				earlier = %earlier,
				later = %later,
				"topic pattern is shadowed by an earlier declaration"
			);
		}

		debug!(company = %registry.company, topics = registry.topics.len(), "topic registry built");
		Ok(registry)
	}

	pub fn company(&self) -> &str {
		&self.company
	}

	pub fn topics(&self) -> &[CompiledTopic] {
		&self.topics
	}

	/// Finds a compiled topic by its type.
	pub fn get(&self, topic_type: &str) -> Option<&CompiledTopic> {
		self.topics.iter().find(|t| t.topic_type() == topic_type)
	}

	/// Returns the type of the first pattern matching `topic`.
	pub fn classify(&self, topic: &str) -> Option<&str> {
		let (stripped, prefixed) = self.strip(topic);
		self
			.topics
			.iter()
			.filter(|t| prefixed || !t.requires_tenant_prefix())
			.find(|t| t.is_match(stripped))
			.map(CompiledTopic::topic_type)
	}

	/// Like [`Registry::classify`], returning the compiled pattern and its
	/// captured segments.
	pub fn lookup(&self, topic: &str) -> Option<TopicMatch<'_>> {
		let (stripped, prefixed) = self.strip(topic);
		self
			.topics
			.iter()
			.filter(|t| prefixed || !t.requires_tenant_prefix())
			.find_map(|t| {
				t.captures(stripped)
					.map(|segments| TopicMatch { topic: t, segments })
			})
	}

	pub fn is_valid(&self, topic: &str) -> bool {
		self.classify(topic).is_some()
	}

	/// Renders the pattern named `topic_type`; empty if unknown or if a field
	/// is missing.
	pub fn render(&self, topic_type: &str, fields: &TopicFields) -> String {
		self
			.get(topic_type)
			.map(|t| t.render(fields))
			.unwrap_or_default()
	}

	/// Pairs `(earlier, later)` where a sample topic of `later`, rendered for
	/// any audience, is classified as `earlier`.
	pub fn shadowed_patterns(&self) -> Vec<(String, String)> {
		let mut shadowed = Vec::new();
		for (index, later) in self.topics.iter().enumerate() {
			let earlier = Audience::ALL.iter().find_map(|&audience| {
				let sample = later.render(&self.sample_fields(later, audience));
				if sample.is_empty() {
					return None;
				}
				let (stripped, _) = self.strip(&sample);
				self.topics[..index].iter().find(|t| t.is_match(stripped))
			});
			if let Some(earlier) = earlier {
				shadowed.push((earlier.topic_type().to_string(), later.topic_type().to_string()));
			}
		}
		shadowed
	}

	fn sample_fields(&self, topic: &CompiledTopic, audience: Audience) -> TopicFields {
		let mut fields = TopicFields::new(self.company.clone())
			.with_audience(audience)
			.with_identity_token("sample0");
		for placeholder in topic.template().placeholders() {
			if let Placeholder::Segment(name) = placeholder {
				fields.segments.insert(name.clone(), "sample".to_string());
			}
		}
		fields
	}

	/// Removes the tenant prefix, reporting whether it was present.
	fn strip<'t>(&self, topic: &'t str) -> (&'t str, bool) {
		match topic.strip_prefix(self.company.as_str()) {
			Some(rest) => (rest, true),
			None => (topic, false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{AccessType, HashKind};
	use proptest::prelude::*;

	fn definitions() -> Vec<TopicDefinition> {
		vec![
			TopicDefinition::new("cab_event", "{company}/{audience}-event-{identityToken}")
				.with_hash_kind(HashKind::SecondaryHash)
				.with_access(Audience::Driver, AccessType::Subscribe)
				.with_access(Audience::Passenger, AccessType::Subscribe),
			TopicDefinition::new("driver_location", "{company}/driver-location-{identityToken}")
				.with_access(Audience::Driver, AccessType::Publish),
			TopicDefinition::new("shared_location", "{company}/{audience}/{identityToken}/{peer}-location")
				.with_access(Audience::Driver, AccessType::Subscribe)
				.with_access(Audience::Passenger, AccessType::Subscribe),
			TopicDefinition::new("node_call_entry", "{company}/{audience}/{identityToken}/call/node/{node}")
				.with_access(Audience::Driver, AccessType::PublishSubscribe),
		]
	}

	fn registry() -> Registry {
		Registry::new("snapp", &definitions()).unwrap()
	}

	#[test]
	fn classifies_each_family() {
		let registry = registry();
		assert_eq!(registry.classify("snapp/driver-event-abc123"), Some("cab_event"));
		assert_eq!(registry.classify("snapp/driver-location-abc123"), Some("driver_location"));
		assert_eq!(
			registry.classify("snapp/passenger/abc123/driver-location"),
			Some("shared_location")
		);
		assert_eq!(
			registry.classify("snapp/driver/abc123/call/node/eu-1"),
			Some("node_call_entry")
		);
	}

	#[test]
	fn unknown_topic_is_not_found() {
		let registry = registry();
		assert_eq!(registry.classify("snapp/unknown-thing"), None);
		assert!(registry.lookup("snapp/unknown-thing").is_none());
		assert!(!registry.is_valid("snapp/unknown-thing"));
	}

	#[test]
	fn lookup_returns_segments() {
		let registry = registry();
		let matched = registry.lookup("snapp/driver/abc123/call/node/eu-1").unwrap();
		assert_eq!(matched.topic.topic_type(), "node_call_entry");
		assert_eq!(matched.segments.get("node").map(String::as_str), Some("eu-1"));
	}

	#[test]
	fn duplicate_types_are_rejected() {
		let mut definitions = definitions();
		definitions.push(TopicDefinition::new("cab_event", "{company}/other"));
		assert_eq!(
			Registry::new("snapp", &definitions).unwrap_err(),
			TopicError::DuplicateType("cab_event".to_string())
		);
	}

	#[test]
	fn first_declared_match_wins() {
		let registry = Registry::new(
			"snapp",
			&[
				TopicDefinition::new("token", "{company}/box-{identityToken}"),
				TopicDefinition::new("segment", "{company}/box-{box}"),
			],
		)
		.unwrap();

		for _ in 0..10 {
			assert_eq!(registry.classify("snapp/box-abc"), Some("token"));
		}
		// Not an identity token, so only the segment pattern accepts it.
		assert_eq!(registry.classify("snapp/box-a.b"), Some("segment"));
		assert_eq!(
			registry.shadowed_patterns(),
			vec![("token".to_string(), "segment".to_string())]
		);
	}

	#[test]
	fn disjoint_patterns_are_not_shadowed() {
		assert!(registry().shadowed_patterns().is_empty());
	}

	#[test]
	fn tenant_prefix_is_required_when_declared() {
		let registry = Registry::new(
			"snapp",
			&[
				TopicDefinition::new("news", "{company}/news")
					.with_access(Audience::Passenger, AccessType::Publish),
				TopicDefinition::new("alerts", "global/{company}/alerts"),
			],
		)
		.unwrap();

		assert_eq!(registry.classify("snapp/news"), Some("news"));
		assert_eq!(registry.classify("/news"), None);
		assert!(registry.lookup("/news").is_none());
		assert_eq!(registry.classify("global/snapp/alerts"), Some("alerts"));
		assert_eq!(registry.classify("global/box/alerts"), None);
	}

	#[test]
	fn shadowing_is_detected_for_every_audience() {
		let registry = Registry::new(
			"snapp",
			&[
				TopicDefinition::new("passenger_feed", "{company}/passenger/{identityToken}"),
				TopicDefinition::new("audience_feed", "{company}/{audience}/{identityToken}"),
			],
		)
		.unwrap();

		assert_eq!(registry.classify("snapp/driver/abc"), Some("audience_feed"));
		assert_eq!(
			registry.shadowed_patterns(),
			vec![("passenger_feed".to_string(), "audience_feed".to_string())]
		);
	}

	#[test]
	fn registry_is_shareable_across_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Registry>();
		assert_send_sync::<crate::IdentityCodec>();
	}

	#[test]
	fn render_unknown_type_is_empty() {
		let fields = TopicFields::new("snapp").with_audience(Audience::Driver);
		assert_eq!(registry().render("missing", &fields), "");
	}

	proptest! {
		#[test]
		fn render_then_classify_roundtrips(
			index in 0usize..4,
			token in "[0-9A-Za-z]{1,24}",
			node in "[a-z0-9-]{1,12}",
			passenger: bool,
		) {
			let registry = registry();
			let topic = &registry.topics()[index];
			let audience = if passenger { Audience::Passenger } else { Audience::Driver };
			let fields = TopicFields::new("snapp")
				.with_audience(audience)
				.with_identity_token(token)
				.with_segment("node", node);
			let rendered = topic.render(&fields);
			prop_assert_eq!(registry.classify(&rendered), Some(topic.topic_type()));
		}
	}
}
