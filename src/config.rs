//! Connection and lookup configuration

use std::time::Duration;

/// Default IMAPS port.
pub const DEFAULT_IMAP_PORT: u16 = 993;

/// Public Have I Been Pwned API endpoint.
pub const DEFAULT_HIBP_URL: &str = "https://haveibeenpwned.com/api/v3";

/// Delay enforced between two consecutive breach-service calls.
pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_secs(2);

/// How the server certificate is checked during the TLS handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    /// Verify against the bundled Mozilla root store.
    #[default]
    WebPki,
    /// Accept any certificate (self-signed servers, local bridges).
    AcceptInvalid,
}

/// IMAP account configuration
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub tls: TlsVerification,
}

impl ImapConfig {
    /// `host:port` as passed to the TCP connector.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Breach service configuration
#[derive(Debug, Clone)]
pub struct HibpConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    /// Sent as `hibp-api-key` when present.
    pub api_key: Option<String>,
    pub user_agent: String,
    /// Minimum spacing between two remote calls.
    pub delay: Duration,
}

impl Default for HibpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HIBP_URL.to_string(),
            api_key: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            delay: DEFAULT_LOOKUP_DELAY,
        }
    }
}
