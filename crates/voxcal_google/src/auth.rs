// --- File: crates/voxcal_google/src/auth.rs ---
//! OAuth token-exchange client for Google.
//!
//! Performs the refresh-token grant against the token endpoint. The
//! client secret comes from the environment (GOOGLE_CLIENT_SECRET);
//! it is held in memory and never logged.

use serde::Deserialize;
use tracing::debug;

use voxcal_common::services::{BoxFuture, ExchangeError, RefreshedToken, TokenExchanger};

pub struct GoogleTokenExchanger {
    http: reqwest::Client,
    token_uri: String,
    client_id: String,
    client_secret: String,
}

impl GoogleTokenExchanger {
    pub fn new(
        http: reqwest::Client,
        token_uri: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http,
            token_uri,
            client_id,
            client_secret,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl TokenExchanger for GoogleTokenExchanger {
    fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> BoxFuture<'_, RefreshedToken, ExchangeError> {
        let refresh_token = refresh_token.to_string();

        Box::pin(async move {
            let form = [
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ];

            debug!("refreshing access token via {}", self.token_uri);
            let response = self
                .http
                .post(&self.token_uri)
                .form(&form)
                .send()
                .await
                .map_err(|e| ExchangeError::Http(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(ExchangeError::Rejected(format!("{}: {}", status, body)));
            }

            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| ExchangeError::Malformed(e.to_string()))?;

            Ok(RefreshedToken {
                access_token: token.access_token,
                expires_in_seconds: token.expires_in,
            })
        })
    }
}
