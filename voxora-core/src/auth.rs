//! Where bearer tokens for the remote service come from.
//!
//! Login flows live elsewhere; the client only asks for the current token.

use std::sync::Arc;

pub const AUTH_TOKEN_ENV: &str = "VOXORA_AUTH_TOKEN";

pub trait CredentialProvider: Send + Sync {
    /// The token to send as `Authorization: Bearer <token>`, if any
    fn bearer_token(&self) -> Option<String>;
}

/// Anonymous access
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable on every request, so a
/// refreshed token is picked up without rebuilding the client
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(AUTH_TOKEN_ENV)
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}
