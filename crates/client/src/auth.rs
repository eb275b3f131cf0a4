// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque authentication collaborator.
//!
//! Login runs on its own task and only reports its outcome. It never gates
//! connection establishment: the supervisor connects whether or not a login
//! is pending, has failed or has succeeded.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Error type for authentication attempts.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The authentication service could not be reached or answered badly.
    #[error("authentication failed: {0}")]
    Failed(String),
}

/// Result type for authentication attempts.
pub type AuthResult<T> = Result<T, AuthError>;

/// Exchanges user credentials with an authentication service.
pub trait Authenticator: Send + Sync + 'static {
    /// Returns `Ok(true)` if the credentials were accepted.
    fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Pin<Box<dyn Future<Output = AuthResult<bool>> + Send + '_>>;
}

/// Password-grant login against an OAuth-style token endpoint.
///
/// Any 2xx answer accepts the credentials; the token itself is not kept.
pub struct TokenAuthenticator {
    url: String,
    client: reqwest::Client,
}

impl TokenAuthenticator {
    pub fn new(url: impl Into<String>) -> Self {
        TokenAuthenticator {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Pin<Box<dyn Future<Output = AuthResult<bool>> + Send + '_>> {
        let form = [
            ("grant_type", "password".to_string()),
            ("username", user.to_string()),
            ("password", password.to_string()),
        ];
        Box::pin(async move {
            let response = self
                .client
                .post(self.url.as_str())
                .form(&form)
                .send()
                .await
                .map_err(|e| AuthError::Failed(e.to_string()))?;
            Ok(response.status().is_success())
        })
    }
}

/// Runs a login on a separate task and logs the outcome.
pub fn spawn_login<A: Authenticator>(
    authenticator: Arc<A>,
    user: String,
    password: String,
) -> JoinHandle<AuthResult<bool>> {
    tokio::spawn(async move {
        let outcome = authenticator.authenticate(&user, &password).await;
        match &outcome {
            Ok(true) => info!("login succeeded for {}", user),
            Ok(false) => warn!("login rejected for {}", user),
            Err(e) => warn!("login failed for {}: {}", user, e),
        }
        outcome
    })
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
