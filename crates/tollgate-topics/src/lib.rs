// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Topic authorization engine for Tollgate.
//!
//! This crate turns declarative topic definitions into compiled patterns and
//! answers three questions about an incoming broker topic:
//!
//! - **Which family is it?** [`Registry::classify`] scans compiled patterns in
//!   declaration order and returns the first match.
//! - **May this audience touch it?** [`has_access`] consults the pattern's
//!   per-audience access table.
//! - **Does the caller own it?** [`SelfTopicValidator`] re-renders the only
//!   legal topic for the caller's identity and compares it byte-for-byte.
//!
//! # Example
//!
//! ```
//! use tollgate_topics::{AccessType, Audience, HashKind, Registry, TopicDefinition};
//!
//! let definition = TopicDefinition::new("driver_location", "{company}/driver/{identityToken}/location")
//!     .with_hash_kind(HashKind::Identity)
//!     .with_access(Audience::Driver, AccessType::Publish);
//!
//! let registry = Registry::new("snapp", &[definition]).unwrap();
//! assert_eq!(registry.classify("snapp/driver/DA2Y1v/location"), Some("driver_location"));
//! assert!(!registry.is_valid("snapp/unknown-thing"));
//! ```
//!
//! Everything here is synchronous and immutable once built, so a [`Registry`]
//! and an [`IdentityCodec`] can be shared behind an `Arc` by any number of
//! concurrent callers.

pub mod access;
pub mod codec;
pub mod error;
pub mod registry;
pub mod self_check;
pub mod template;
pub mod topic;
pub mod types;

pub use access::{grants, has_access, AllowedAccessTypes};
pub use codec::{secondary_hash, CodecParams, IdentityCodec, SECONDARY_HASH_PREFIX};
pub use error::{CodecError, ParseError, TemplateError, TopicError};
pub use registry::{Registry, TopicMatch};
pub use self_check::SelfTopicValidator;
pub use template::{Placeholder, Template, TopicFields};
pub use topic::{CompiledTopic, TopicDefinition};
pub use types::{AccessType, Audience, HashKind};
