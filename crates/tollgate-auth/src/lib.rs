// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization orchestration for the Tollgate broker gateway.
//!
//! This crate wires the topic engine to the outside world:
//!
//! - [`TopicAuthorizer`] runs the ordered publish/subscribe checks for one vendor
//! - [`Authenticator`] exposes the broker hooks (`auth` on connect, `acl` per topic)
//! - [`Gateway`] picks the authenticator for a vendor, falling back to the default
//! - [`Validator`] and [`Store`] are the seams to external services
//! - [`AccountService`] manages broker accounts with Argon2 password hashes

pub mod account;
pub mod authenticator;
pub mod authorizer;
pub mod blacklist;
pub mod claims;
pub mod decision;
pub mod error;
pub mod gateway;
pub mod issuer;
pub mod store;
pub mod validator;

pub use account::{Account, AccountError, AccountKind, AccountService, ACCOUNT_MODEL};
pub use authenticator::Authenticator;
pub use authorizer::TopicAuthorizer;
pub use blacklist::BlackList;
pub use claims::{Claims, ClaimsError};
pub use decision::{Decision, DenyReason};
pub use error::AuthError;
pub use gateway::Gateway;
pub use issuer::IssuerMap;
pub use store::{MemoryStore, Store, StoreError};
pub use validator::{gateway_headers, Payload, UnavailableValidator, Validator, ValidatorError, SERVICE_NAME};
