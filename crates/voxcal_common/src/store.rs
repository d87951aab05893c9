// --- File: crates/voxcal_common/src/store.rs ---
//! In-memory implementation of the integration store.
//!
//! Suitable for tests and single-process deployments. A mutex over the
//! whole map serializes updates per key, so two concurrent refreshes for
//! the same (user, provider) pair cannot interleave a partial write.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::services::{BoxFuture, Integration, IntegrationStore, StoreError};

/// Mutex-held map keyed by (user id, provider tag).
#[derive(Default)]
pub struct InMemoryIntegrationStore {
    records: Mutex<HashMap<(String, String), Integration>>,
}

impl InMemoryIntegrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a full integration record. Used by tests and by
    /// whatever external flow completes OAuth consent.
    pub fn upsert(&self, integration: Integration) {
        let key = (integration.user_id.clone(), integration.provider.clone());
        self.records
            .lock()
            .expect("integration store mutex poisoned")
            .insert(key, integration);
    }
}

impl IntegrationStore for InMemoryIntegrationStore {
    fn get(
        &self,
        user_id: &str,
        provider: &str,
    ) -> BoxFuture<'_, Option<Integration>, StoreError> {
        let key = (user_id.to_string(), provider.to_string());
        Box::pin(async move {
            let records = self
                .records
                .lock()
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            Ok(records.get(&key).cloned())
        })
    }

    fn update_access_token(
        &self,
        user_id: &str,
        provider: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> BoxFuture<'_, (), StoreError> {
        let key = (user_id.to_string(), provider.to_string());
        let access_token = access_token.to_string();
        Box::pin(async move {
            let mut records = self
                .records
                .lock()
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            let record = records.get_mut(&key).ok_or_else(|| {
                StoreError::Backend(format!("no integration for user {}", key.0))
            })?;
            record.access_token = Some(access_token);
            record.token_expires_at = Some(expires_at);
            record.updated_at = Utc::now();
            Ok(())
        })
    }
}
