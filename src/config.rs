//! Client configuration and credential storage.
//!
//! [`LookbackConfig`] is an immutable snapshot produced by
//! [`LookbackApiBuilder`](crate::builder::LookbackApiBuilder) and shared
//! read-only across requests. Configure before first use; the client never
//! mutates it.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Rally server queried when no server override is configured.
pub const DEFAULT_SERVER: &str = "https://rally1.rallydev.com";

/// Default Lookback API version, composed as `v{major}.{minor}`.
pub const DEFAULT_VERSION: (&str, &str) = ("2", "0");

/// A basic-auth username/password pair.
///
/// Only basic authentication is supported, for both the Rally server and
/// the proxy scope. The password is held as a [`SecretString`] so it stays
/// out of `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Immutable configuration snapshot for a [`LookbackApi`](crate::client::LookbackApi).
#[derive(Debug, Clone)]
pub struct LookbackConfig {
    pub(crate) server: Url,
    pub(crate) version_major: String,
    pub(crate) version_minor: String,
    pub(crate) workspace: Option<String>,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) proxy: Option<Url>,
    pub(crate) proxy_credentials: Option<Credentials>,
}

impl LookbackConfig {
    /// Whether primary (Rally server) credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Whether proxy credentials are configured. Ignored unless a proxy
    /// server is also configured.
    pub fn has_proxy_credentials(&self) -> bool {
        self.proxy_credentials.is_some()
    }

    /// Whether requests are routed through a proxy server.
    pub fn has_proxy_server(&self) -> bool {
        self.proxy.is_some()
    }

    /// Whether a Rally server address is configured. Always `true` once the
    /// config is built, since the server falls back to [`DEFAULT_SERVER`].
    pub fn has_server(&self) -> bool {
        true
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    pub fn version(&self) -> (&str, &str) {
        (&self.version_major, &self.version_minor)
    }

    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn proxy_server(&self) -> Option<&Url> {
        self.proxy.as_ref()
    }

    pub fn proxy_credentials(&self) -> Option<&Credentials> {
        self.proxy_credentials.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LookbackConfig {
        LookbackConfig {
            server: Url::parse(DEFAULT_SERVER).unwrap(),
            version_major: DEFAULT_VERSION.0.to_string(),
            version_minor: DEFAULT_VERSION.1.to_string(),
            workspace: None,
            credentials: None,
            proxy: None,
            proxy_credentials: None,
        }
    }

    #[test]
    fn credential_predicates_are_independent() {
        let mut cfg = config();
        assert!(!cfg.has_credentials());
        assert!(!cfg.has_proxy_credentials());
        assert!(!cfg.has_proxy_server());
        assert!(cfg.has_server());

        cfg.proxy_credentials = Some(Credentials::new("proxy-user", "proxy-pass"));
        assert!(cfg.has_proxy_credentials());
        assert!(!cfg.has_credentials());
        assert!(!cfg.has_proxy_server());
    }

    #[test]
    fn debug_output_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
