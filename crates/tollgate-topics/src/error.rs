// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::types::Audience;

/// Errors raised while compiling topic definitions into a registry.
///
/// All of these are configuration errors: they surface at startup and the
/// gateway refuses to serve with a registry that failed to build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicError {
	#[error("topic '{topic_type}' has an invalid template: {source}")]
	InvalidTemplate {
		topic_type: String,
		#[source]
		source: TemplateError,
	},

	#[error("topic type '{0}' is declared more than once")]
	DuplicateType(String),

	#[error("topic '{topic_type}' grants access to unknown audience '{audience}'")]
	UnknownAudience { topic_type: String, audience: String },

	#[error("topic '{topic_type}' produced an invalid matcher: {message}")]
	Matcher { topic_type: String, message: String },
}

/// Syntax errors in a topic template string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
	#[error("unclosed placeholder starting at byte {position}")]
	UnclosedPlaceholder { position: usize },

	#[error("unexpected '}}' at byte {position}")]
	UnexpectedClose { position: usize },

	#[error("empty placeholder at byte {position}")]
	EmptyPlaceholder { position: usize },

	#[error("placeholder '{name}' is not a valid identifier")]
	InvalidPlaceholder { name: String },

	#[error("placeholder '{name}' appears more than once")]
	DuplicateSegment { name: String },
}

/// Errors from the identity codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
	#[error("could not decode identity token for audience {audience}")]
	Decode { audience: Audience },

	#[error("no codec parameters configured for audience {0}")]
	UnknownAudience(Audience),
}

/// A string did not name a known enum value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
	pub kind: &'static str,
	pub value: String,
}

impl ParseError {
	pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
		Self {
			kind,
			value: value.into(),
		}
	}
}
