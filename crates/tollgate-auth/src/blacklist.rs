// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashSet;

use tollgate_config::BlackListConfig;

/// Users flagged for logging when they authenticate through one issuer.
///
/// Membership never denies a request on its own.
#[derive(Debug, Clone, Default)]
pub struct BlackList {
	issuer: Option<i64>,
	users: HashSet<u64>,
}

impl BlackList {
	pub fn new(issuer: i64, users: impl IntoIterator<Item = u64>) -> Self {
		Self {
			issuer: Some(issuer),
			users: users.into_iter().collect(),
		}
	}

	pub fn from_config(config: &BlackListConfig) -> Self {
		Self {
			issuer: config.issuer,
			users: config.user_ids.iter().copied().collect(),
		}
	}

	pub fn is_blacklisted(&self, user_id: u64, issuer: i64) -> bool {
		self.issuer == Some(issuer) && self.users.contains(&user_id)
	}
}
