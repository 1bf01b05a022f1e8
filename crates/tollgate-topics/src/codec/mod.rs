// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity codec: per-audience obfuscated ids and the one-way secondary hash.
//!
//! Each audience has its own salt and minimum token length, so a token issued
//! to a driver never decodes to the same id under passenger parameters.

mod hashids;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::Audience;
use hashids::Hashids;

/// Prefix mixed into the secondary hash input.
pub const SECONDARY_HASH_PREFIX: &str = "emqch";

/// Salt and minimum length for one audience's identity tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecParams {
	pub salt: String,
	#[serde(default)]
	pub length: usize,
}

impl CodecParams {
	pub fn new(salt: impl Into<String>, length: usize) -> Self {
		Self {
			salt: salt.into(),
			length,
		}
	}
}

/// Encodes and decodes identity tokens for every configured audience.
#[derive(Debug, Clone, Default)]
pub struct IdentityCodec {
	encoders: BTreeMap<Audience, Hashids>,
}

impl IdentityCodec {
	pub fn new(params: impl IntoIterator<Item = (Audience, CodecParams)>) -> Self {
		let encoders = params
			.into_iter()
			.map(|(audience, p)| (audience, Hashids::new(&p.salt, p.length)))
			.collect();
		Self { encoders }
	}

	/// Returns true if parameters are configured for `audience`.
	pub fn supports(&self, audience: Audience) -> bool {
		self.encoders.contains_key(&audience)
	}

	/// Decodes a token into the numeric id it encodes for `audience`.
	///
	/// Tokens carrying more than one number are rejected: each identity has
	/// exactly one canonical token.
	pub fn decode(&self, token: &str, audience: Audience) -> Result<u64, CodecError> {
		let ids = self
			.encoder(audience)?
			.decode(token)
			.ok_or(CodecError::Decode { audience })?;
		match ids.as_slice() {
			[id] => Ok(*id),
			_ => Err(CodecError::Decode { audience }),
		}
	}

	/// Encodes a numeric id into the canonical token for `audience`.
	pub fn encode(&self, id: u64, audience: Audience) -> Result<String, CodecError> {
		Ok(self.encoder(audience)?.encode(&[id]))
	}

	fn encoder(&self, audience: Audience) -> Result<&Hashids, CodecError> {
		self
			.encoders
			.get(&audience)
			.ok_or(CodecError::UnknownAudience(audience))
	}
}

/// One-way token for topics that must not leak a reusable identity token.
///
/// Lowercase hex MD5 of `"emqch-<id>"`.
pub fn secondary_hash(id: u64) -> String {
	format!("{:x}", md5::compute(format!("{SECONDARY_HASH_PREFIX}-{id}")))
}
