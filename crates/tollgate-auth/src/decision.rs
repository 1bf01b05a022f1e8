// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outcome of an authorization request.

use thiserror::Error;
use tollgate_topics::AccessType;

/// Why a request was denied. The message text is what the broker logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
	#[error("requested access type {0} is invalid")]
	InvalidAccessType(AccessType),

	#[error("issuer not found in claims")]
	IssuerMissing,

	#[error("subject not found in claims")]
	SubjectMissing,

	#[error("token claims could not be read: {0}")]
	InvalidClaims(String),

	#[error("topic {topic} is not recognized")]
	TopicNotRecognized { topic: String },

	#[error(
		"issuer {issuer} with subject {subject} is not allowed to {access_type} on topic {topic} ({topic_type})"
	)]
	TopicNotAllowed {
		issuer: String,
		subject: String,
		access_type: AccessType,
		topic: String,
		topic_type: String,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	Allow { topic_type: String },
	Deny(DenyReason),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow { .. })
	}

	pub fn reason(&self) -> Option<&DenyReason> {
		match self {
			Decision::Allow { .. } => None,
			Decision::Deny(reason) => Some(reason),
		}
	}

	/// Converts into the matched topic type or the deny reason.
	pub fn into_result(self) -> Result<String, DenyReason> {
		match self {
			Decision::Allow { topic_type } => Ok(topic_type),
			Decision::Deny(reason) => Err(reason),
		}
	}
}
