// --- File: crates/voxcal_webhook/src/tokens.rs ---
//! OAuth access-token lifecycle management.
//!
//! Owns the decision of when a stored access token is still usable and
//! when a refresh exchange is required. A token within five minutes of
//! expiry is treated as expired so a calendar call never starts with a
//! token that dies mid-flight.

use chrono::{Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use voxcal_common::services::{IntegrationStore, StoreError, TokenExchanger};

/// Tokens expiring within this many minutes are refreshed eagerly.
pub const REFRESH_THRESHOLD_MINUTES: i64 = 5;

#[derive(Error, Debug)]
pub enum TokenError {
    /// No integration record exists for the user.
    #[error("calendar not connected")]
    CalendarNotConnected,
    /// Token expired and no refresh token is stored; the user must
    /// redo the OAuth consent flow.
    #[error("calendar authorization expired")]
    ReauthRequired,
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct TokenManager {
    store: Arc<dyn IntegrationStore>,
    exchanger: Arc<dyn TokenExchanger>,
    provider: String,
}

impl TokenManager {
    pub fn new(
        store: Arc<dyn IntegrationStore>,
        exchanger: Arc<dyn TokenExchanger>,
        provider: String,
    ) -> Self {
        Self {
            store,
            exchanger,
            provider,
        }
    }

    /// Return an access token valid for at least the refresh threshold.
    ///
    /// A stored, unexpired token is returned without any network call.
    /// Otherwise the refresh exchange runs, and the new token plus its
    /// expiry are persisted before being returned. A failed refresh
    /// leaves the stored record untouched.
    pub async fn get_valid_access_token(&self, user_id: &str) -> Result<String, TokenError> {
        let integration = self
            .store
            .get(user_id, &self.provider)
            .await?
            .ok_or(TokenError::CalendarNotConnected)?;

        let refresh_horizon = Utc::now() + Duration::minutes(REFRESH_THRESHOLD_MINUTES);
        if let (Some(token), Some(expiry)) =
            (&integration.access_token, integration.token_expires_at)
        {
            if expiry > refresh_horizon {
                debug!(user_id, "stored access token still valid");
                return Ok(token.clone());
            }
        }

        let refresh_token = integration
            .refresh_token
            .as_deref()
            .ok_or(TokenError::ReauthRequired)?;

        let refreshed = self
            .exchanger
            .refresh_access_token(refresh_token)
            .await
            .map_err(|e| {
                error!(user_id, error = %e, "token refresh exchange failed");
                TokenError::RefreshFailed(e.to_string())
            })?;

        let expires_at = Utc::now() + Duration::seconds(refreshed.expires_in_seconds);
        self.store
            .update_access_token(user_id, &self.provider, &refreshed.access_token, expires_at)
            .await?;
        debug!(user_id, "access token refreshed");
        Ok(refreshed.access_token)
    }
}
