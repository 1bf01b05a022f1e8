// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Topic template parsing and rendering.
//!
//! Templates are literal text with `{name}` placeholders:
//!
//! ```text
//! {company}/driver/{identityToken}/location
//! {company}/{audience}/{identityToken}/call/node/{node}
//! ```
//!
//! Four placeholder names are well known ([`Placeholder::Company`],
//! [`Placeholder::Audience`], [`Placeholder::Peer`],
//! [`Placeholder::IdentityToken`]). Any other identifier is a named segment
//! whose value is captured from the incoming topic by the matcher.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::trace;

use crate::error::TemplateError;
use crate::types::Audience;

const COMPANY: &str = "company";
const AUDIENCE: &str = "audience";
const PEER: &str = "peer";
const IDENTITY_TOKEN: &str = "identityToken";

/// Characters an identity token may contain (hashids alphabet and hex digests).
const IDENTITY_TOKEN_PATTERN: &str = "[0-9A-Za-z]+";
const SEGMENT_PATTERN: &str = "[^/]+";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placeholder {
	Company,
	Audience,
	Peer,
	IdentityToken,
	Segment(String),
}

impl Placeholder {
	fn parse(name: &str, position: usize) -> Result<Self, TemplateError> {
		if name.is_empty() {
			return Err(TemplateError::EmptyPlaceholder { position });
		}
		if !is_identifier(name) {
			return Err(TemplateError::InvalidPlaceholder {
				name: name.to_string(),
			});
		}

		Ok(match name {
			COMPANY => Placeholder::Company,
			AUDIENCE => Placeholder::Audience,
			PEER => Placeholder::Peer,
			IDENTITY_TOKEN => Placeholder::IdentityToken,
			other => Placeholder::Segment(other.to_string()),
		})
	}

	/// True for placeholders whose value depends on who is asking.
	pub fn is_identity_scoped(&self) -> bool {
		matches!(
			self,
			Placeholder::Audience | Placeholder::Peer | Placeholder::IdentityToken
		)
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
	Literal(String),
	Field(Placeholder),
}

/// Values substituted into a template.
///
/// The set of fields is closed: the well-known values are plain fields and
/// pattern-specific values live in `segments`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFields {
	pub company: String,
	pub audience: Option<Audience>,
	pub peer: Option<Audience>,
	pub identity_token: Option<String>,
	pub segments: BTreeMap<String, String>,
}

impl TopicFields {
	pub fn new(company: impl Into<String>) -> Self {
		Self {
			company: company.into(),
			..Default::default()
		}
	}

	/// Sets the audience and its peer together.
	pub fn with_audience(mut self, audience: Audience) -> Self {
		self.audience = Some(audience);
		self.peer = Some(audience.peer());
		self
	}

	pub fn with_identity_token(mut self, token: impl Into<String>) -> Self {
		self.identity_token = Some(token.into());
		self
	}

	pub fn with_segment(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.segments.insert(name.into(), value.into());
		self
	}

	fn get(&self, placeholder: &Placeholder) -> Option<&str> {
		match placeholder {
			Placeholder::Company => Some(self.company.as_str()),
			Placeholder::Audience => self.audience.map(Audience::as_str),
			Placeholder::Peer => self.peer.map(Audience::as_str),
			Placeholder::IdentityToken => self.identity_token.as_deref(),
			Placeholder::Segment(name) => self.segments.get(name).map(String::as_str),
		}
	}
}

/// A parsed topic template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	source: String,
	parts: Vec<Part>,
}

impl Template {
	pub fn parse(source: &str) -> Result<Self, TemplateError> {
		let mut parts = Vec::new();
		let mut literal = String::new();
		let mut segments: Vec<&str> = Vec::new();
		let mut chars = source.char_indices();

		while let Some((position, c)) = chars.next() {
			match c {
				'{' => {
					let start = position + 1;
					let end = chars
						.by_ref()
						.find(|&(_, c)| c == '}')
						.map(|(i, _)| i)
						.ok_or(TemplateError::UnclosedPlaceholder { position })?;
					let name = &source[start..end];
					let placeholder = Placeholder::parse(name, position)?;

					if let Placeholder::Segment(_) = placeholder {
						if segments.contains(&name) {
							return Err(TemplateError::DuplicateSegment {
								name: name.to_string(),
							});
						}
						segments.push(name);
					}

					if !literal.is_empty() {
						parts.push(Part::Literal(std::mem::take(&mut literal)));
					}
					parts.push(Part::Field(placeholder));
				}
				'}' => return Err(TemplateError::UnexpectedClose { position }),
				c => literal.push(c),
			}
		}

		if !literal.is_empty() {
			parts.push(Part::Literal(literal));
		}

		Ok(Self {
			source: source.to_string(),
			parts,
		})
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
		self.parts.iter().filter_map(|part| match part {
			Part::Field(placeholder) => Some(placeholder),
			Part::Literal(_) => None,
		})
	}

	/// Names of the pattern-specific segments, in template order.
	pub fn segment_names(&self) -> impl Iterator<Item = &str> {
		self.placeholders().filter_map(|p| match p {
			Placeholder::Segment(name) => Some(name.as_str()),
			_ => None,
		})
	}

	/// True if the rendered topic depends on the caller's identity.
	pub fn is_identity_scoped(&self) -> bool {
		self.placeholders().any(Placeholder::is_identity_scoped)
	}

	/// True if the template begins with the tenant prefix.
	pub fn starts_with_company(&self) -> bool {
		matches!(self.parts.first(), Some(Part::Field(Placeholder::Company)))
	}

	/// Substitutes `fields` into the template.
	///
	/// Returns an empty string when a required field is missing; callers must
	/// treat that as "no match".
	pub fn render(&self, fields: &TopicFields) -> String {
		let mut out = String::with_capacity(self.source.len() + 32);
		for part in &self.parts {
			match part {
				Part::Literal(text) => out.push_str(text),
				Part::Field(placeholder) => match fields.get(placeholder) {
					Some(value) => out.push_str(value),
					None => {
						trace!(template = %self.source, ?placeholder, "missing field during render");
						return String::new();
					}
				},
			}
		}
		out
	}

	/// Regular expression recognizing rendered topics with the tenant prefix
	/// already stripped.
	///
	/// A leading `{company}` matches nothing because the registry strips it;
	/// anywhere else it matches the tenant name literally.
	pub(crate) fn matcher_source(&self, company: &str) -> String {
		let audiences = Audience::ALL
			.iter()
			.map(|a| a.as_str())
			.collect::<Vec<_>>()
			.join("|");

		let mut pattern = String::from("^");
		for (index, part) in self.parts.iter().enumerate() {
			match part {
				Part::Literal(text) => pattern.push_str(&regex::escape(text)),
				Part::Field(Placeholder::Company) if index == 0 => {}
				Part::Field(Placeholder::Company) => pattern.push_str(&regex::escape(company)),
				Part::Field(Placeholder::Audience | Placeholder::Peer) => {
					let _ = write!(pattern, "(?:{audiences})");
				}
				Part::Field(Placeholder::IdentityToken) => pattern.push_str(IDENTITY_TOKEN_PATTERN),
				Part::Field(Placeholder::Segment(name)) => {
					let _ = write!(pattern, "(?P<{name}>{SEGMENT_PATTERN})");
				}
			}
		}
		pattern.push('$');
		pattern
	}
}
