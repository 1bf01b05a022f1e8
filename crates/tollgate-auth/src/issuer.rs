// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use tollgate_topics::Audience;

/// Resolves the issuer claim of a token to the audience it speaks for.
///
/// Explicit entries win; otherwise an issuer spelled as an audience name
/// (`driver`, `passenger`) resolves to that audience.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuerMap {
	entries: BTreeMap<String, Audience>,
}

impl IssuerMap {
	pub fn new(entries: impl IntoIterator<Item = (String, Audience)>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
		}
	}

	pub fn resolve(&self, issuer: &str) -> Option<Audience> {
		self
			.entries
			.get(issuer)
			.copied()
			.or_else(|| issuer.parse().ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn explicit_entries_take_priority() {
		let map = IssuerMap::new([
			("0".to_string(), Audience::Driver),
			("passenger".to_string(), Audience::Driver),
		]);
		assert_eq!(map.resolve("0"), Some(Audience::Driver));
		assert_eq!(map.resolve("passenger"), Some(Audience::Driver));
	}

	#[test]
	fn falls_back_to_audience_names() {
		let map = IssuerMap::default();
		assert_eq!(map.resolve("driver"), Some(Audience::Driver));
		assert_eq!(map.resolve("passenger"), Some(Audience::Passenger));
		assert_eq!(map.resolve("1"), None);
		assert_eq!(map.resolve(""), None);
	}
}
