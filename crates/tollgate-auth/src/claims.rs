// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity claims consumed by the authorizer.
//!
//! Claims arrive already verified: signature checks happen in the external
//! validator when the client connects. For ACL hooks the broker only forwards
//! the raw bearer token, so [`Claims::from_unverified_jwt`] reads the payload
//! segment without checking the signature.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;
use tollgate_config::JwtConfig;

#[derive(Error, Debug)]
pub enum ClaimsError {
	#[error("token could not be decoded: {0}")]
	Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Issuer, subject and any other claims of a verified identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
	issuer: Option<String>,
	subject: Option<String>,
	extra: Map<String, Value>,
}

impl Claims {
	pub fn new(issuer: impl Into<String>, subject: impl Into<String>) -> Self {
		Self {
			issuer: Some(issuer.into()),
			subject: Some(subject.into()),
			extra: Map::new(),
		}
	}

	/// Builder: set issuer.
	pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
		self.issuer = Some(issuer.into());
		self
	}

	/// Builder: set subject.
	pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = Some(subject.into());
		self
	}

	/// Builder: set an additional claim.
	pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
		self.extra.insert(name.into(), value);
		self
	}

	pub fn issuer(&self) -> Option<&str> {
		self.issuer.as_deref()
	}

	pub fn subject(&self) -> Option<&str> {
		self.subject.as_deref()
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.extra.get(name)
	}

	/// Extracts issuer and subject from a claims object by configured names.
	///
	/// Numeric and boolean claims are stringified; null, empty, array and
	/// object values count as absent.
	pub fn from_map(mut map: Map<String, Value>, names: &JwtConfig) -> Self {
		let issuer = map.remove(&names.iss_name).and_then(claim_to_string);
		let subject = map.remove(&names.sub_name).and_then(claim_to_string);
		Self {
			issuer,
			subject,
			extra: map,
		}
	}

	/// Reads claims from a JWT without verifying its signature.
	///
	/// The header must still be a well-formed JWT header.
	pub fn from_unverified_jwt(token: &str, names: &JwtConfig) -> Result<Self, ClaimsError> {
		let token = token
			.strip_prefix("Bearer ")
			.or_else(|| token.strip_prefix("bearer "))
			.unwrap_or(token)
			.trim();

		let data = decode::<Map<String, Value>>(
			token,
			&DecodingKey::from_secret(&[]),
			&unverified_validation(),
		)?;
		Ok(Self::from_map(data.claims, names))
	}
}

/// Validation that skips the signature and every registered-claim check.
fn unverified_validation() -> Validation {
	let mut validation = Validation::default();
	validation.insecure_disable_signature_validation();
	validation.required_spec_claims.clear();
	validation.validate_exp = false;
	validation.validate_aud = false;
	validation
}

fn claim_to_string(value: Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}
