//! Transport seam between the request executor and the HTTP stack.
//!
//! [`Transport`] is the injectable boundary used by
//! [`LookbackApi`](crate::client::LookbackApi): the default implementation
//! is [`HttpTransport`] over [`reqwest`], and tests substitute stubs to
//! observe dispatch behavior without a network.

use std::collections::HashMap;

use async_trait::async_trait;
use url::Url;

use crate::config::{Credentials, LookbackConfig};
use crate::error::{LookbackError, Result};

/// A single outbound snapshot query request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Fully composed endpoint URL.
    pub url: Url,
    /// UTF-8 JSON rendering of the query, sent verbatim as the POST body.
    pub body: String,
    /// Primary credentials for the Rally server scope. `None` when no
    /// credentials are configured or the transport does not support
    /// credential injection.
    pub credentials: Option<Credentials>,
}

/// Raw transport-level response.
///
/// Consumed exactly once: either rejected by the response validator or
/// handed to the deserializer. The body handle, when present, releases its
/// underlying stream on drop.
pub struct RawResponse {
    pub status: u16,
    /// Response headers with lowercased names.
    pub headers: HashMap<String, String>,
    /// Response body, absent when the server sent none.
    pub body: Option<Box<dyn ResponseBody>>,
}

/// Handle to a response body stream.
///
/// Reading consumes the handle, and dropping it releases the underlying
/// stream, so release happens exactly once whether parsing succeeds or the
/// response is rejected first.
#[async_trait]
pub trait ResponseBody: Send + std::fmt::Debug {
    /// Read the complete body contents.
    async fn bytes(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Transport capable of dispatching a snapshot query POST.
///
/// Whether basic-auth credentials can be injected is a fixed capability of
/// the transport, decided at construction. When a transport reports
/// `supports_credentials() == false` the executor dispatches the request
/// unauthenticated instead of failing; see
/// [`LookbackApi::execute_query`](crate::client::LookbackApi::execute_query).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether this transport can attach basic-auth credentials to a
    /// request.
    fn supports_credentials(&self) -> bool {
        false
    }

    /// Dispatch the request and wait for the complete response. Network and
    /// IO failures surface as [`LookbackError::Transport`], never retried.
    async fn post(&self, request: OutboundRequest) -> Result<RawResponse>;
}

/// Default [`Transport`] backed by [`reqwest`].
///
/// Proxy routing and proxy credentials are bound to the underlying client
/// at construction, scoped to the proxy host. Primary credentials arrive
/// per request and are sent as preemptive basic auth on the request URL's
/// host.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport honoring the proxy settings of `config`.
    pub fn for_config(config: &LookbackConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(proxy_url) = config.proxy_server() {
            let mut proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| {
                LookbackError::Configuration(format!("invalid proxy server `{proxy_url}`: {e}"))
            })?;
            if let Some(creds) = config.proxy_credentials() {
                proxy = proxy.basic_auth(creds.username(), creds.password());
            }
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            LookbackError::Configuration(format!("failed to build http client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing [`reqwest::Client`]. Proxy settings of that client
    /// are the caller's responsibility.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn supports_credentials(&self) -> bool {
        true
    }

    async fn post(&self, request: OutboundRequest) -> Result<RawResponse> {
        let mut builder = self.client.post(request.url).body(request.body);
        if let Some(creds) = &request.credentials {
            builder = builder.basic_auth(creds.username(), Some(creds.password()));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();

        let bytes = response.bytes().await?;
        let body: Option<Box<dyn ResponseBody>> = if bytes.is_empty() {
            None
        } else {
            Some(Box::new(BufferedBody(bytes.to_vec())))
        };

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Body already transferred in full by the HTTP layer.
#[derive(Debug)]
struct BufferedBody(Vec<u8>);

#[async_trait]
impl ResponseBody for BufferedBody {
    async fn bytes(self: Box<Self>) -> Result<Vec<u8>> {
        Ok(self.0)
    }
}
