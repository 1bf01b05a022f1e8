// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Topic definitions and their compiled form.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TopicError;
use crate::template::{Template, TopicFields};
use crate::types::{AccessType, Audience, HashKind};

/// Declarative configuration for one topic family.
///
/// Access tables are keyed by audience name; unknown names are rejected when
/// the definition is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDefinition {
	#[serde(rename = "type")]
	pub topic_type: String,
	pub template: String,
	#[serde(default)]
	pub hash_kind: HashKind,
	#[serde(default)]
	pub accesses: BTreeMap<String, AccessType>,
}

impl TopicDefinition {
	pub fn new(topic_type: impl Into<String>, template: impl Into<String>) -> Self {
		Self {
			topic_type: topic_type.into(),
			template: template.into(),
			hash_kind: HashKind::default(),
			accesses: BTreeMap::new(),
		}
	}

	/// Builder: set hash_kind.
	pub fn with_hash_kind(mut self, hash_kind: HashKind) -> Self {
		self.hash_kind = hash_kind;
		self
	}

	/// Builder: declare access for an audience.
	pub fn with_access(mut self, audience: Audience, access: AccessType) -> Self {
		self.accesses.insert(audience.to_string(), access);
		self
	}
}

/// Runtime form of a [`TopicDefinition`]: renderer, matcher and access table.
///
/// Immutable once compiled.
#[derive(Debug, Clone)]
pub struct CompiledTopic {
	topic_type: String,
	template: Template,
	matcher: Regex,
	hash_kind: HashKind,
	accesses: BTreeMap<Audience, AccessType>,
}

impl CompiledTopic {
	/// Compiles a definition for the tenant `company`.
	pub fn compile(definition: &TopicDefinition, company: &str) -> Result<Self, TopicError> {
		let topic_type = definition.topic_type.clone();

		let template =
			Template::parse(&definition.template).map_err(|source| TopicError::InvalidTemplate {
				topic_type: topic_type.clone(),
				source,
			})?;

		let matcher =
			Regex::new(&template.matcher_source(company)).map_err(|e| TopicError::Matcher {
				topic_type: topic_type.clone(),
				message: e.to_string(),
			})?;

		let accesses = definition
			.accesses
			.iter()
			.map(|(name, access)| {
				name
					.parse::<Audience>()
					.map(|audience| (audience, *access))
					.map_err(|_| TopicError::UnknownAudience {
						topic_type: topic_type.clone(),
						audience: name.clone(),
					})
			})
			.collect::<Result<_, _>>()?;

		Ok(Self {
			topic_type,
			template,
			matcher,
			hash_kind: definition.hash_kind,
			accesses,
		})
	}

	pub fn topic_type(&self) -> &str {
		&self.topic_type
	}

	pub fn template(&self) -> &Template {
		&self.template
	}

	pub fn hash_kind(&self) -> HashKind {
		self.hash_kind
	}

	/// Declared access for `audience`; `None` when the audience is absent.
	pub fn access_for(&self, audience: Audience) -> Option<AccessType> {
		self.accesses.get(&audience).copied()
	}

	/// True if the caller must own the topic, i.e. it embeds identity fields.
	pub fn requires_ownership(&self) -> bool {
		self.template.is_identity_scoped()
	}

	/// True if matching topics must carry the tenant prefix.
	pub fn requires_tenant_prefix(&self) -> bool {
		self.template.starts_with_company()
	}

	/// Matches a topic with the tenant prefix already stripped.
	pub fn is_match(&self, stripped: &str) -> bool {
		self.matcher.is_match(stripped)
	}

	/// Like [`CompiledTopic::is_match`], also returning named segment values.
	pub fn captures(&self, stripped: &str) -> Option<BTreeMap<String, String>> {
		let captures = self.matcher.captures(stripped)?;
		Some(
			self
				.template
				.segment_names()
				.filter_map(|name| {
					captures
						.name(name)
						.map(|m| (name.to_string(), m.as_str().to_string()))
				})
				.collect(),
		)
	}

	pub fn render(&self, fields: &TopicFields) -> String {
		self.template.render(fields)
	}
}
