//! Fluent construction of [`LookbackApi`] clients.

use std::sync::Arc;

use url::Url;

use crate::client::LookbackApi;
use crate::config::{Credentials, DEFAULT_SERVER, DEFAULT_VERSION, LookbackConfig};
use crate::error::{LookbackError, Result};
use crate::transport::{HttpTransport, Transport};

/// Builder for [`LookbackApi`].
///
/// Setters chain; [`build`](Self::build) validates addresses, freezes the
/// configuration into an immutable snapshot, and constructs the transport.
/// A workspace is required to execute a query but not to build one, so a
/// client can be constructed before the workspace is known.
///
/// ```no_run
/// use rally_lookback::LookbackApi;
///
/// # fn main() -> Result<(), rally_lookback::LookbackError> {
/// let api = LookbackApi::builder()
///     .credentials("myRallyUsername", "myRallyPassword")
///     .workspace("12345")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct LookbackApiBuilder {
    server: Option<String>,
    version: Option<(String, String)>,
    workspace: Option<String>,
    credentials: Option<Credentials>,
    proxy: Option<String>,
    proxy_credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
}

impl LookbackApiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Rally server to communicate with, protocol included.
    /// Defaults to [`DEFAULT_SERVER`].
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Set the Lookback API version. Defaults to [`DEFAULT_VERSION`].
    pub fn version(mut self, major: impl Into<String>, minor: impl Into<String>) -> Self {
        self.version = Some((major.into(), minor.into()));
        self
    }

    /// Set the workspace queries run against. Required before any query
    /// executes; you must have read permission for it.
    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Set Rally credentials. Basic auth only.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Set the proxy server to route requests through, protocol included
    /// (e.g. `http://myproxy:8080`).
    pub fn proxy_server(mut self, server: impl Into<String>) -> Self {
        self.proxy = Some(server.into());
        self
    }

    /// Set credentials for the proxy server. Ignored unless a proxy server
    /// is also set. Basic auth only.
    pub fn proxy_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.proxy_credentials = Some(Credentials::new(username, password));
        self
    }

    /// Inject a custom [`Transport`] instead of the default reqwest-backed
    /// one. Proxy routing then becomes the transport's responsibility, and
    /// credentials are only attached when the transport reports support for
    /// them.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Freeze the configuration and construct the client.
    ///
    /// Fails with [`LookbackError::Configuration`] when the server or proxy
    /// address does not parse, or when the HTTP client cannot be built.
    pub fn build(self) -> Result<LookbackApi> {
        let server = self.server.as_deref().unwrap_or(DEFAULT_SERVER);
        let server = Url::parse(server).map_err(|e| {
            LookbackError::Configuration(format!("invalid server address `{server}`: {e}"))
        })?;

        let proxy = self
            .proxy
            .map(|p| {
                Url::parse(&p).map_err(|e| {
                    LookbackError::Configuration(format!("invalid proxy address `{p}`: {e}"))
                })
            })
            .transpose()?;

        let (version_major, version_minor) = self.version.unwrap_or_else(|| {
            (
                DEFAULT_VERSION.0.to_string(),
                DEFAULT_VERSION.1.to_string(),
            )
        });

        let config = LookbackConfig {
            server,
            version_major,
            version_minor,
            workspace: self.workspace,
            credentials: self.credentials,
            proxy,
            proxy_credentials: self.proxy_credentials,
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::for_config(&config)?),
        };

        Ok(LookbackApi::from_parts(config, transport))
    }
}

impl std::fmt::Debug for LookbackApiBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookbackApiBuilder")
            .field("server", &self.server)
            .field("version", &self.version)
            .field("workspace", &self.workspace)
            .field("has_credentials", &self.credentials.is_some())
            .field("proxy", &self.proxy)
            .field("has_proxy_credentials", &self.proxy_credentials.is_some())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
