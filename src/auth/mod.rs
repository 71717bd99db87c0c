//! Authentication module for the Mailgun client.
//!
//! Mailgun uses HTTP Basic authentication with the fixed username `api` and
//! the account API key as the password.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::MailgunConfig;
use crate::errors::DeliveryError;

/// Username Mailgun expects for API key authentication.
pub const API_USERNAME: &str = "api";

/// Authentication provider trait.
///
/// Implementations of this trait provide authentication credentials
/// for API requests.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), DeliveryError>;
}

/// HTTP Basic authentication provider.
pub struct BasicAuth {
    username: String,
    password: SecretString,
}

impl BasicAuth {
    /// Creates a new Basic authentication provider.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Creates the `api:<api_key>` credentials for a configuration.
    pub fn from_config(config: &MailgunConfig) -> Self {
        Self::new(API_USERNAME, SecretString::new(config.api_key().to_string()))
    }

    /// Returns the full `Authorization` header value.
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password.expose_secret());
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

impl AuthProvider for BasicAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            ::http::header::AUTHORIZATION.to_string(),
            self.header_value(),
        );
    }

    fn scheme(&self) -> &str {
        "Basic"
    }

    fn validate(&self) -> Result<(), DeliveryError> {
        if self.password.expose_secret().is_empty() {
            return Err(DeliveryError::configuration("API key cannot be empty"));
        }
        if self.username.contains(':') {
            return Err(DeliveryError::configuration(
                "Basic auth username cannot contain ':'",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
