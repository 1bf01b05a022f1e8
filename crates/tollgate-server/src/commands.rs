// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand implementations. Each returns the text to print.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{bail, Context};
use tollgate_auth::{Claims, Decision, Gateway, UnavailableValidator};
use tollgate_config::GatewayConfig;
use tollgate_topics::AccessType;
use tracing::warn;

/// Compiles every vendor and reports patterns that can never match.
pub fn check_config(config: &GatewayConfig) -> anyhow::Result<String> {
	let gateway = build_gateway(config)?;

	let mut report = String::new();
	for vendor in gateway.vendors() {
		let authenticator = gateway.authenticator(Some(vendor));
		let registry = authenticator.authorizer().registry();
		let marker = if vendor == gateway.default_vendor() {
			" (default)"
		} else {
			""
		};
		writeln!(report, "{vendor}{marker}: {} topic patterns", registry.topics().len())?;
		for (by, shadowed) in registry.shadowed_patterns() {
			warn!(vendor, shadowed = %shadowed, by = %by, "pattern is unreachable");
			writeln!(report, "  {shadowed} is shadowed by {by}")?;
		}
	}
	Ok(report)
}

/// Where the identity for an `authorize` request comes from.
pub enum Identity {
	Token(String),
	Claims { issuer: String, subject: String },
}

/// Runs one authorization request and renders the decision.
pub fn authorize(
	config: &GatewayConfig,
	vendor: Option<&str>,
	access: AccessType,
	topic: &str,
	identity: Identity,
) -> anyhow::Result<(bool, String)> {
	let gateway = build_gateway(config)?;
	let authenticator = gateway.authenticator(vendor);

	let decision = match identity {
		Identity::Token(token) => authenticator.acl(access, &token, topic),
		Identity::Claims { issuer, subject } => {
			authenticator
				.authorizer()
				.authorize(access, topic, &Claims::new(issuer, subject))
		}
	};

	Ok(match decision {
		Decision::Allow { topic_type } => (true, format!("allow {access} on {topic} ({topic_type})")),
		Decision::Deny(reason) => (false, format!("deny: {reason}")),
	})
}

/// Builds the identity from CLI flags.
pub fn identity_from_flags(
	token: Option<String>,
	issuer: Option<String>,
	subject: Option<String>,
) -> anyhow::Result<Identity> {
	match (token, issuer, subject) {
		(Some(token), None, None) => Ok(Identity::Token(token)),
		(None, Some(issuer), Some(subject)) => Ok(Identity::Claims { issuer, subject }),
		_ => bail!("pass either --token or both --issuer and --subject"),
	}
}

fn build_gateway(config: &GatewayConfig) -> anyhow::Result<Gateway> {
	Gateway::from_config(config, Arc::new(UnavailableValidator)).context("failed to compile vendors")
}
