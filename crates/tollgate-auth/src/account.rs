// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Broker accounts: sign-up, credential checks and removal.
//!
//! Passwords are stored as Argon2id PHC strings, never in plain text.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::store::{Store, StoreError};

/// Model name account records are stored under.
pub const ACCOUNT_MODEL: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
	Superuser,
	ThirdParty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub username: String,
	pub password_hash: String,
	pub kind: AccountKind,
	pub created_at: DateTime<Utc>,
	pub modified_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum AccountError {
	#[error("account '{0}' already exists")]
	AlreadyExists(String),

	#[error("account '{0}' not found")]
	NotFound(String),

	#[error("username and password must not be empty")]
	EmptyCredentials,

	#[error("password hashing failed: {0}")]
	PasswordHash(String),

	#[error("account record is corrupt: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error(transparent)]
	Store(StoreError),
}

impl From<StoreError> for AccountError {
	fn from(error: StoreError) -> Self {
		match error {
			StoreError::AlreadyExists { key, .. } => AccountError::AlreadyExists(key),
			StoreError::NotFound { key, .. } => AccountError::NotFound(key),
			other => AccountError::Store(other),
		}
	}
}

/// Argon2id with reduced cost under test.
fn password_hasher() -> Argon2<'static> {
	#[cfg(test)]
	{
		use argon2::{Algorithm, Params, Version};
		match Params::new(1024, 1, 1, None) {
			Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
			Err(_) => Argon2::default(),
		}
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}

fn hash_password(password: &str) -> Result<String, AccountError> {
	let salt = SaltString::generate(&mut OsRng);
	password_hasher()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AccountError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
	match PasswordHash::new(hash) {
		Ok(parsed) => password_hasher()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok(),
		Err(_) => false,
	}
}

pub struct AccountService {
	store: Arc<dyn Store>,
}

impl AccountService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	#[instrument(level = "debug", skip(self, password))]
	pub async fn sign_up(
		&self,
		username: &str,
		password: &str,
		kind: AccountKind,
	) -> Result<Account, AccountError> {
		if username.is_empty() || password.is_empty() {
			return Err(AccountError::EmptyCredentials);
		}

		let now = Utc::now();
		let account = Account {
			username: username.to_string(),
			password_hash: hash_password(password)?,
			kind,
			created_at: now,
			modified_at: now,
		};
		self
			.store
			.save(ACCOUNT_MODEL, username, serde_json::to_value(&account)?)
			.await?;

		info!(username, ?kind, "account created");
		Ok(account)
	}

	pub async fn get(&self, username: &str) -> Result<Account, AccountError> {
		let value = self.store.get(ACCOUNT_MODEL, username).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Checks a username/password pair. Unknown users fail the check.
	#[instrument(level = "debug", skip(self, password))]
	pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, AccountError> {
		match self.get(username).await {
			Ok(account) => Ok(verify_password(password, &account.password_hash)),
			Err(AccountError::NotFound(_)) => Ok(false),
			Err(e) => Err(e),
		}
	}

	pub async fn change_password(&self, username: &str, password: &str) -> Result<Account, AccountError> {
		if password.is_empty() {
			return Err(AccountError::EmptyCredentials);
		}
		let mut account = self.get(username).await?;
		account.password_hash = hash_password(password)?;
		account.modified_at = Utc::now();
		self
			.store
			.update(ACCOUNT_MODEL, username, serde_json::to_value(&account)?)
			.await?;
		Ok(account)
	}

	pub async fn delete(&self, username: &str) -> Result<(), AccountError> {
		self.store.delete(ACCOUNT_MODEL, username).await?;
		info!(username, "account deleted");
		Ok(())
	}
}
