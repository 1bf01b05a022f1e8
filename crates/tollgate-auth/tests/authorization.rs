// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end authorization scenarios against a realistic vendor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderMap;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tollgate_auth::{
	Authenticator, Claims, Decision, DenyReason, Payload, TopicAuthorizer, Validator, ValidatorError,
};
use tollgate_config::{BlackListConfig, VendorConfig};
use tollgate_topics::{AccessType, Audience, CodecParams, HashKind, IdentityCodec, TopicDefinition};

const DRIVER_SALT: &str = "driver-salt";
const PASSENGER_SALT: &str = "passenger-salt";

fn vendor() -> VendorConfig {
	let mut vendor = VendorConfig::new("snapp");
	vendor
		.hashids
		.insert("driver".to_string(), CodecParams::new(DRIVER_SALT, 15));
	vendor
		.hashids
		.insert("passenger".to_string(), CodecParams::new(PASSENGER_SALT, 15));
	vendor.issuers.insert("0".to_string(), Audience::Driver);
	vendor.issuers.insert("1".to_string(), Audience::Passenger);
	vendor.blacklist = BlackListConfig {
		issuer: Some(0),
		user_ids: vec![13],
	};
	vendor.topics = vec![
		TopicDefinition::new("driver_location", "{company}/driver/{identityToken}/location")
			.with_access(Audience::Driver, AccessType::Publish),
		TopicDefinition::new("cab_event", "{company}/{audience}-event-{identityToken}")
			.with_hash_kind(HashKind::SecondaryHash)
			.with_access(Audience::Driver, AccessType::Subscribe)
			.with_access(Audience::Passenger, AccessType::Subscribe),
		TopicDefinition::new("chat", "{company}/chat/{audience}/{identityToken}/{peer}/{chatId}")
			.with_access(Audience::Driver, AccessType::PublishSubscribe)
			.with_access(Audience::Passenger, AccessType::PublishSubscribe),
	];
	vendor
}

fn codec() -> IdentityCodec {
	IdentityCodec::new([
		(Audience::Driver, CodecParams::new(DRIVER_SALT, 15)),
		(Audience::Passenger, CodecParams::new(PASSENGER_SALT, 15)),
	])
}

fn driver_token(id: u64) -> String {
	codec().encode(id, Audience::Driver).unwrap()
}

fn authorizer() -> TopicAuthorizer {
	TopicAuthorizer::from_vendor(&vendor()).unwrap()
}

/// A JWT signed with a key the gateway never sees.
fn foreign_jwt(iss: serde_json::Value, sub: &str) -> String {
	encode(
		&Header::default(),
		&json!({"iss": iss, "sub": sub}),
		&EncodingKey::from_secret(b"issuer-only-secret"),
	)
	.unwrap()
}

#[test]
fn driver_publishes_own_location() {
	let token = driver_token(1001);
	let decision = authorizer().authorize(
		AccessType::Publish,
		&format!("snapp/driver/{token}/location"),
		&Claims::new("0", token),
	);
	assert_eq!(decision.into_result(), Ok("driver_location".to_string()));
}

#[test]
fn spoofed_location_is_denied() {
	let decision = authorizer().authorize(
		AccessType::Publish,
		&format!("snapp/driver/{}/location", driver_token(1002)),
		&Claims::new("0", driver_token(1001)),
	);
	assert!(matches!(
		decision.reason(),
		Some(DenyReason::TopicNotAllowed { topic_type, .. }) if topic_type == "driver_location"
	));
}

#[test]
fn subscribe_denied_where_only_publish_declared() {
	let token = driver_token(1001);
	let decision = authorizer().authorize(
		AccessType::Subscribe,
		&format!("snapp/driver/{token}/location"),
		&Claims::new("0", token),
	);
	assert!(matches!(
		decision,
		Decision::Deny(DenyReason::TopicNotAllowed { .. })
	));
}

#[test]
fn secondary_hash_topic_uses_md5_token() {
	let token = driver_token(77);
	let hashed = tollgate_topics::secondary_hash(77);
	let decision = authorizer().authorize(
		AccessType::Subscribe,
		&format!("snapp/driver-event-{hashed}"),
		&Claims::new("0", token.clone()),
	);
	assert!(decision.is_allowed());

	let decision = authorizer().authorize(
		AccessType::Subscribe,
		&format!("snapp/driver-event-{token}"),
		&Claims::new("0", token),
	);
	assert!(!decision.is_allowed());
}

#[test]
fn chat_topic_keeps_free_segment() {
	let token = driver_token(5);
	let decision = authorizer().authorize(
		AccessType::Publish,
		&format!("snapp/chat/driver/{token}/passenger/ride-9"),
		&Claims::new("0", token.clone()),
	);
	assert!(decision.is_allowed());

	let decision = authorizer().authorize(
		AccessType::Publish,
		&format!("snapp/chat/passenger/{token}/driver/ride-9"),
		&Claims::new("0", token),
	);
	assert!(!decision.is_allowed());
}

#[test]
fn unknown_topic_is_not_recognized() {
	let decision = authorizer().authorize(
		AccessType::Subscribe,
		"snapp/unknown/topic",
		&Claims::new("0", driver_token(1)),
	);
	assert_eq!(
		decision.reason(),
		Some(&DenyReason::TopicNotRecognized {
			topic: "snapp/unknown/topic".to_string()
		})
	);
}

#[test]
fn other_tenant_prefix_is_not_recognized() {
	let token = driver_token(1);
	let decision = authorizer().authorize(
		AccessType::Publish,
		&format!("box/driver/{token}/location"),
		&Claims::new("0", token),
	);
	assert!(matches!(
		decision.reason(),
		Some(DenyReason::TopicNotRecognized { .. })
	));
}

#[test]
fn pubsub_is_not_a_requestable_access() {
	let token = driver_token(1);
	let decision = authorizer().authorize(
		AccessType::PublishSubscribe,
		&format!("snapp/driver/{token}/location"),
		&Claims::new("0", token),
	);
	assert_eq!(
		decision.reason(),
		Some(&DenyReason::InvalidAccessType(AccessType::PublishSubscribe))
	);
}

struct FixedValidator {
	payload: Payload,
	calls: AtomicUsize,
}

#[async_trait]
impl Validator for FixedValidator {
	async fn validate(&self, headers: &HeaderMap, bearer: &str) -> Result<Payload, ValidatorError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		assert!(headers.contains_key("x-service-name"));
		if bearer == "bearer good" {
			Ok(self.payload.clone())
		} else {
			Err(ValidatorError::Rejected("bad signature".to_string()))
		}
	}
}

fn authenticator(validator: Arc<FixedValidator>) -> Authenticator {
	Authenticator::from_vendor(&vendor(), validator).unwrap()
}

#[tokio::test]
async fn auth_passes_blacklisted_users_through() {
	let validator = Arc::new(FixedValidator {
		payload: Payload {
			user_id: 13,
			iss: 0,
			..Default::default()
		},
		calls: AtomicUsize::new(0),
	});
	let authenticator = authenticator(Arc::clone(&validator));

	let payload = authenticator.auth("good").await.unwrap();
	assert_eq!(payload.user_id, 13);
	assert!(authenticator.auth("forged").await.is_err());
	assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn acl_reads_unverified_claims() {
	let authenticator = authenticator(Arc::new(FixedValidator {
		payload: Payload::default(),
		calls: AtomicUsize::new(0),
	}));
	let token = driver_token(1001);

	let decision = authenticator.acl(
		AccessType::Publish,
		&foreign_jwt(json!(0), &token),
		&format!("snapp/driver/{token}/location"),
	);
	assert!(decision.is_allowed());

	let signed = foreign_jwt(json!(0), &token);
	let (_, rest) = signed.split_once('.').unwrap();
	let decision = authenticator.acl(
		AccessType::Publish,
		&format!("!!!not-a-header!!!.{rest}"),
		&format!("snapp/driver/{token}/location"),
	);
	assert!(matches!(decision.reason(), Some(DenyReason::InvalidClaims(_))));

	let decision = authenticator.acl(AccessType::Publish, "not-a-jwt", "snapp/anything");
	assert!(matches!(decision.reason(), Some(DenyReason::InvalidClaims(_))));
}
