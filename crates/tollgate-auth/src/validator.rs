// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Interface to the external token validation service.

use async_trait::async_trait;
use http::header::{HeaderName, HeaderValue, USER_AGENT};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name this gateway announces itself with.
pub const SERVICE_NAME: &str = "tollgate";

/// Identity returned by the validator for an accepted token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
	pub user_id: u64,
	pub iss: i64,
	pub sub: String,
	pub aud: String,
	pub iat: i64,
	pub exp: i64,
	pub email: String,
	pub locale: String,
	pub sid: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
	#[error("token rejected by validator: {0}")]
	Rejected(String),

	#[error("validator unavailable: {0}")]
	Unavailable(String),
}

/// Verifies a bearer token and returns the identity behind it.
#[async_trait]
pub trait Validator: Send + Sync {
	async fn validate(&self, headers: &HeaderMap, bearer: &str) -> Result<Payload, ValidatorError>;
}

/// Validator used when no validation service is configured. Rejects everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableValidator;

#[async_trait]
impl Validator for UnavailableValidator {
	async fn validate(&self, _headers: &HeaderMap, _bearer: &str) -> Result<Payload, ValidatorError> {
		Err(ValidatorError::Unavailable(
			"no token validator configured".to_string(),
		))
	}
}

/// Headers sent with every validation request.
pub fn gateway_headers() -> HeaderMap {
	let mut headers = HeaderMap::new();
	headers.insert(
		HeaderName::from_static("x-service-name"),
		HeaderValue::from_static(SERVICE_NAME),
	);
	headers.insert(
		HeaderName::from_static("x-app-name"),
		HeaderValue::from_static(SERVICE_NAME),
	);
	headers.insert(USER_AGENT, HeaderValue::from_static(SERVICE_NAME));
	headers.insert(
		HeaderName::from_static("locale"),
		HeaderValue::from_static("en-US"),
	);
	headers
}
