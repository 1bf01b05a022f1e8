// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Value types for topic authorization.
//!
//! - [`AccessType`]: what a client asks to do with a topic (publish, subscribe, or both)
//! - [`Audience`]: the principal class a client belongs to
//! - [`HashKind`]: how the identity token embedded in a topic is derived
//!
//! There is no "unset" access value. An audience missing from a topic's access
//! table is represented by `None`, and `None` never grants anything.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Access requested on, or declared for, a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
	#[serde(alias = "sub")]
	Subscribe,
	#[serde(alias = "pub")]
	Publish,
	/// Wildcard: satisfies both publish and subscribe requests.
	#[serde(alias = "pubsub")]
	PublishSubscribe,
}

impl AccessType {
	pub const ALL: [AccessType; 3] = [
		AccessType::Subscribe,
		AccessType::Publish,
		AccessType::PublishSubscribe,
	];

	/// Numeric code used by brokers in ACL hooks.
	pub fn code(self) -> u8 {
		match self {
			AccessType::Subscribe => 1,
			AccessType::Publish => 2,
			AccessType::PublishSubscribe => 3,
		}
	}

	/// Maps a broker access code back to an access type.
	pub fn from_code(code: u8) -> Option<Self> {
		match code {
			1 => Some(AccessType::Subscribe),
			2 => Some(AccessType::Publish),
			3 => Some(AccessType::PublishSubscribe),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			AccessType::Subscribe => "subscribe",
			AccessType::Publish => "publish",
			AccessType::PublishSubscribe => "publish_subscribe",
		}
	}
}

impl fmt::Display for AccessType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AccessType {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"subscribe" | "sub" | "1" => Ok(AccessType::Subscribe),
			"publish" | "pub" | "2" => Ok(AccessType::Publish),
			"publish_subscribe" | "pubsub" | "3" => Ok(AccessType::PublishSubscribe),
			_ => Err(ParseError::new("access type", s)),
		}
	}
}

/// Principal classes with their own identity encoding and topic permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
	Driver,
	Passenger,
}

impl Audience {
	pub const ALL: [Audience; 2] = [Audience::Driver, Audience::Passenger];

	/// The complementary role on the other end of a ride.
	pub fn peer(self) -> Audience {
		match self {
			Audience::Driver => Audience::Passenger,
			Audience::Passenger => Audience::Driver,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Audience::Driver => "driver",
			Audience::Passenger => "passenger",
		}
	}
}

impl fmt::Display for Audience {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Audience {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"driver" => Ok(Audience::Driver),
			"passenger" => Ok(Audience::Passenger),
			_ => Err(ParseError::new("audience", s)),
		}
	}
}

/// How the identity token inside a topic is derived from the caller's subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashKind {
	/// The canonical reversible token for the caller's numeric id.
	#[default]
	#[serde(alias = "hash_id")]
	Identity,
	/// A one-way digest of the numeric id; cannot be turned back into a credential.
	#[serde(alias = "md5")]
	SecondaryHash,
}
