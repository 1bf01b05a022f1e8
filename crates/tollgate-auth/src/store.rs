// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keyed record storage used by account management.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
	#[error("{model} '{key}' not found")]
	NotFound { model: String, key: String },

	#[error("{model} '{key}' already exists")]
	AlreadyExists { model: String, key: String },

	#[error("store backend error: {0}")]
	Backend(String),
}

/// Records grouped by model name and addressed by key.
#[async_trait]
pub trait Store: Send + Sync {
	async fn get(&self, model: &str, key: &str) -> Result<Value, StoreError>;

	/// Inserts a new record; fails if the key is taken.
	async fn save(&self, model: &str, key: &str, value: Value) -> Result<(), StoreError>;

	/// Replaces an existing record.
	async fn update(&self, model: &str, key: &str, value: Value) -> Result<(), StoreError>;

	async fn delete(&self, model: &str, key: &str) -> Result<(), StoreError>;
}

/// In-process store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
	records: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

fn record_key(model: &str, key: &str) -> (String, String) {
	(model.to_string(), key.to_string())
}

fn not_found(model: &str, key: &str) -> StoreError {
	StoreError::NotFound {
		model: model.to_string(),
		key: key.to_string(),
	}
}

#[async_trait]
impl Store for MemoryStore {
	async fn get(&self, model: &str, key: &str) -> Result<Value, StoreError> {
		self
			.records
			.read()
			.await
			.get(&record_key(model, key))
			.cloned()
			.ok_or_else(|| not_found(model, key))
	}

	async fn save(&self, model: &str, key: &str, value: Value) -> Result<(), StoreError> {
		let mut records = self.records.write().await;
		let id = record_key(model, key);
		if records.contains_key(&id) {
			return Err(StoreError::AlreadyExists {
				model: model.to_string(),
				key: key.to_string(),
			});
		}
		records.insert(id, value);
		Ok(())
	}

	async fn update(&self, model: &str, key: &str, value: Value) -> Result<(), StoreError> {
		let mut records = self.records.write().await;
		match records.get_mut(&record_key(model, key)) {
			Some(existing) => {
				*existing = value;
				Ok(())
			}
			None => Err(not_found(model, key)),
		}
	}

	async fn delete(&self, model: &str, key: &str) -> Result<(), StoreError> {
		self
			.records
			.write()
			.await
			.remove(&record_key(model, key))
			.map(|_| ())
			.ok_or_else(|| not_found(model, key))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[tokio::test]
	async fn save_then_get() {
		let store = MemoryStore::new();
		store.save("user", "alice", json!({"a": 1})).await.unwrap();
		assert_eq!(store.get("user", "alice").await.unwrap(), json!({"a": 1}));
		assert!(matches!(
			store.get("team", "alice").await,
			Err(StoreError::NotFound { .. })
		));
	}

	#[tokio::test]
	async fn save_refuses_existing_key() {
		let store = MemoryStore::new();
		store.save("user", "alice", json!(1)).await.unwrap();
		assert!(matches!(
			store.save("user", "alice", json!(2)).await,
			Err(StoreError::AlreadyExists { .. })
		));
		assert_eq!(store.get("user", "alice").await.unwrap(), json!(1));
	}

	#[tokio::test]
	async fn update_requires_existing_key() {
		let store = MemoryStore::new();
		assert!(store.update("user", "bob", json!(1)).await.is_err());
		store.save("user", "bob", json!(1)).await.unwrap();
		store.update("user", "bob", json!(2)).await.unwrap();
		assert_eq!(store.get("user", "bob").await.unwrap(), json!(2));
	}

	#[tokio::test]
	async fn delete_removes_record() {
		let store = MemoryStore::new();
		store.save("user", "carol", json!(null)).await.unwrap();
		store.delete("user", "carol").await.unwrap();
		assert!(store.get("user", "carol").await.is_err());
		assert!(store.delete("user", "carol").await.is_err());
	}
}
