//! Configuration module for the Mailgun client.
//!
//! A [`MailgunConfig`] carries exactly what a delivery needs to address the
//! provider: the API key, the sending domain and an optional base URL
//! override. Transport concerns such as timeouts are configured on the
//! transport, not here.

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{DeliveryError, DeliveryResult};

/// Default base URL for the Mailgun API (US region).
pub const DEFAULT_BASE_URL: &str = "https://api.mailgun.net/v3";

/// Base URL for Mailgun accounts hosted in the EU region.
pub const MAILGUN_EU_BASE_URL: &str = "https://api.eu.mailgun.net/v3";

/// Configuration for a Mailgun delivery.
#[derive(Clone)]
pub struct MailgunConfig {
    api_key: SecretString,
    domain: String,
    base_url: Option<String>,
}

impl MailgunConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MailgunConfigBuilder {
        MailgunConfigBuilder::new()
    }

    /// Creates a configuration from an API key and domain.
    pub fn new(api_key: impl Into<String>, domain: impl Into<String>) -> DeliveryResult<Self> {
        Self::builder().api_key(api_key).domain(domain).build()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MAILGUN_API_KEY` (required): API key for authentication
    /// - `MAILGUN_DOMAIN` (required): Sending domain
    /// - `MAILGUN_BASE_URL` (optional): Custom base URL
    pub fn from_env() -> DeliveryResult<Self> {
        let mut builder = MailgunConfigBuilder::new()
            .api_key_from_env("MAILGUN_API_KEY")?
            .domain_from_env("MAILGUN_DOMAIN")?;

        if let Ok(base_url) = std::env::var("MAILGUN_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        let key = self.api_key.expose_secret();
        match key.len().checked_sub(4).and_then(|start| key.get(start..)) {
            Some(tail) if key.len() > 4 => format!("...{}", tail),
            _ => "****".to_string(),
        }
    }

    /// Returns the sending domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the base URL override, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns the base URL in effect, falling back to [`DEFAULT_BASE_URL`].
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Returns the messages endpoint: `{base_url}/{domain}/messages`.
    pub fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.effective_base_url(), self.domain)
    }
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_key", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for `MailgunConfig`.
#[derive(Default)]
pub struct MailgunConfigBuilder {
    api_key: Option<String>,
    domain: Option<String>,
    base_url: Option<String>,
}

impl MailgunConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> DeliveryResult<Self> {
        let api_key = std::env::var(var_name).map_err(|_| DeliveryError::Configuration {
            message: format!("Environment variable {} not set", var_name),
        })?;
        self.api_key = Some(api_key);
        Ok(self)
    }

    /// Sets the sending domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the sending domain from an environment variable.
    pub fn domain_from_env(mut self, var_name: &str) -> DeliveryResult<Self> {
        let domain = std::env::var(var_name).map_err(|_| DeliveryError::Configuration {
            message: format!("Environment variable {} not set", var_name),
        })?;
        self.domain = Some(domain);
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Targets the EU region endpoint.
    pub fn eu_region(self) -> Self {
        self.base_url(MAILGUN_EU_BASE_URL)
    }

    /// Builds the configuration.
    pub fn build(self) -> DeliveryResult<MailgunConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| DeliveryError::configuration("API key is required"))?;

        if api_key.is_empty() {
            return Err(DeliveryError::configuration("API key cannot be empty"));
        }

        let domain = self
            .domain
            .ok_or_else(|| DeliveryError::configuration("Domain is required"))?
            .trim()
            .to_string();

        if domain.is_empty() {
            return Err(DeliveryError::configuration("Domain cannot be empty"));
        }

        if let Some(c) = domain.chars().find(|c| !is_domain_char(*c)) {
            return Err(DeliveryError::Configuration {
                message: format!("Domain '{}' contains invalid character '{}'", domain, c),
            });
        }

        let base_url = match self.base_url {
            Some(raw) => {
                let base_url = raw.trim_end_matches('/').to_string();
                let parsed = url::Url::parse(&base_url)?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(DeliveryError::Configuration {
                        message: format!("Unsupported base URL scheme '{}'", parsed.scheme()),
                    });
                }
                if parsed.query().is_some() || parsed.fragment().is_some() {
                    return Err(DeliveryError::configuration(
                        "Base URL must not carry a query or fragment",
                    ));
                }
                if parsed.scheme() == "http" {
                    tracing::warn!(base_url = %base_url, "Base URL does not use HTTPS");
                }
                Some(base_url)
            }
            None => None,
        };

        Ok(MailgunConfig {
            api_key: SecretString::new(api_key),
            domain,
            base_url,
        })
    }
}

// The domain is spliced into the endpoint path unescaped.
fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_success() {
        let config = MailgunConfig::builder()
            .api_key("key-test_api_key_12345")
            .domain("mg.example.com")
            .base_url("https://custom.mailgun.example/v3")
            .build()
            .unwrap();

        assert_eq!(config.api_key(), "key-test_api_key_12345");
        assert_eq!(config.domain(), "mg.example.com");
        assert_eq!(config.base_url(), Some("https://custom.mailgun.example/v3"));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = MailgunConfig::new("key-test", "mg.example.com").unwrap();

        assert_eq!(config.base_url(), None);
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_builder_missing_api_key() {
        let result = MailgunConfig::builder().domain("mg.example.com").build();
        assert!(matches!(result, Err(DeliveryError::Configuration { .. })));
    }

    #[test]
    fn test_config_builder_empty_api_key() {
        let result = MailgunConfig::new("", "mg.example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_missing_domain() {
        let result = MailgunConfig::builder().api_key("key-test").build();
        assert!(result.is_err());

        let result = MailgunConfig::new("key-test", "   ");
        assert!(result.is_err());
    }

    #[test]
    fn test_domain_with_url_syntax_rejected() {
        for domain in [
            "mg.example.com/extra",
            "mg.example.com?x=1",
            "mg.example.com#frag",
            "mg.example .com",
            "mg%2Eexample.com",
            "user@mg.example.com",
        ] {
            let result = MailgunConfig::new("key-test", domain);
            assert!(
                matches!(result, Err(DeliveryError::Configuration { .. })),
                "domain {:?} should be rejected",
                domain
            );
        }
    }

    #[test]
    fn test_domain_trimmed_and_kept() {
        let config = MailgunConfig::new("key-test", "  sandbox_1.mg-example.com ").unwrap();
        assert_eq!(config.domain(), "sandbox_1.mg-example.com");

        let url = url::Url::parse(&config.messages_url()).unwrap();
        assert_eq!(url.path(), "/v3/sandbox_1.mg-example.com/messages");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_config_builder_invalid_base_url() {
        let result = MailgunConfig::builder()
            .api_key("key-test")
            .domain("mg.example.com")
            .base_url("not a url")
            .build();
        assert!(result.is_err());

        let result = MailgunConfig::builder()
            .api_key("key-test")
            .domain("mg.example.com")
            .base_url("ftp://api.mailgun.net/v3")
            .build();
        assert!(result.is_err());

        let result = MailgunConfig::builder()
            .api_key("key-test")
            .domain("mg.example.com")
            .base_url("https://api.mailgun.net/v3?region=eu")
            .build();
        assert!(matches!(result, Err(DeliveryError::Configuration { .. })));
    }

    #[test]
    fn test_messages_url() {
        let config = MailgunConfig::new("key-test", "mg.example.com").unwrap();
        assert_eq!(
            config.messages_url(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );

        let config = MailgunConfig::builder()
            .api_key("key-test")
            .domain("mg.example.com")
            .base_url("http://localhost:4000/v3/")
            .build()
            .unwrap();
        assert_eq!(
            config.messages_url(),
            "http://localhost:4000/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_eu_region() {
        let config = MailgunConfig::builder()
            .api_key("key-test")
            .domain("mg.example.com")
            .eu_region()
            .build()
            .unwrap();
        assert_eq!(
            config.messages_url(),
            "https://api.eu.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_api_key_hint() {
        let config = MailgunConfig::new("key-secret_12345", "mg.example.com").unwrap();

        let hint = config.api_key_hint();
        assert_eq!(hint, "...2345");
        assert!(!hint.contains("secret"));
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = MailgunConfig::new("key-secret", "mg.example.com").unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("key-secret"));
        assert!(debug_str.contains("mg.example.com"));
    }
}
