// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;
use tollgate_config::ConfigError;
use tollgate_topics::TopicError;

use crate::validator::ValidatorError;

#[derive(Error, Debug)]
pub enum AuthError {
	#[error("topics of vendor '{company}' are invalid: {source}")]
	Topics {
		company: String,
		#[source]
		source: TopicError,
	},

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("token rejected: {0}")]
	Token(#[from] ValidatorError),

	#[error("vendor '{0}' is not configured")]
	UnknownVendor(String),
}
