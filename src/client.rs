//! The Lookback API client.
//!
//! [`LookbackApi`] drives the whole request pipeline: endpoint composition,
//! credential application, dispatch, response validation, deserialization,
//! result cross-checking, and pagination. One request executes per
//! [`execute_query`](LookbackApi::execute_query) call; the call resolves
//! only once the full response has arrived. No retry, caching, or timeout
//! policy is applied here; wrap the call if a deployment needs one.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::builder::LookbackApiBuilder;
use crate::config::LookbackConfig;
use crate::endpoint;
use crate::error::{LookbackError, Result};
use crate::query::LookbackQuery;
use crate::response;
use crate::result::LookbackResult;
use crate::transport::{OutboundRequest, RawResponse, Transport};

/// Client for Rally's Lookback API.
///
/// Construct one via [`LookbackApi::builder`], then execute queries:
///
/// ```no_run
/// use rally_lookback::LookbackApi;
///
/// # async fn run() -> Result<(), rally_lookback::LookbackError> {
/// let api = LookbackApi::builder()
///     .credentials("myRallyUsername", "myRallyPassword")
///     .workspace("myRallyWorkspace")
///     .build()?;
///
/// let query = api
///     .new_snapshot_query()
///     .find_clause("_TypeHierarchy", "Defect")
///     .fields(["ObjectID", "State"]);
///
/// let mut result = api.execute_query(&query).await?;
/// while result.has_more_pages() {
///     let next = api.query_for_next_page(&result)?;
///     result = api.execute_query(&next).await?;
/// }
/// # Ok(())
/// # }
/// ```
///
/// The client holds an immutable configuration snapshot and is cheap to
/// clone and share across tasks; each caller should use its own query and
/// result values.
#[derive(Clone)]
pub struct LookbackApi {
    config: LookbackConfig,
    transport: Arc<dyn Transport>,
}

impl LookbackApi {
    /// Start configuring a client.
    pub fn builder() -> LookbackApiBuilder {
        LookbackApiBuilder::new()
    }

    pub(crate) fn from_parts(config: LookbackConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The configuration snapshot this client was built with.
    pub fn config(&self) -> &LookbackConfig {
        &self.config
    }

    /// Create a new snapshot query for configuring and executing.
    pub fn new_snapshot_query(&self) -> LookbackQuery {
        LookbackQuery::new()
    }

    /// Execute a snapshot query and return its validated result.
    ///
    /// The pipeline runs in a fixed order: compose the endpoint URL (fails
    /// before any network call when the workspace is unset), dispatch the
    /// POST, gate the raw response (401 / empty body), deserialize, then
    /// cross-check the result against `query` exactly once. The first
    /// failure ends the session for this query.
    pub async fn execute_query(&self, query: &LookbackQuery) -> Result<LookbackResult> {
        let raw = self.execute_request(query.request_json()).await?;
        let entity = response::validate_response(raw)?;
        let mut result = response::parse_result(entity).await?;
        result.validate(query)?;
        // Carry the originating query so the next page can re-request the
        // same selector with an advanced start index.
        result.attach_query_context(query.clone());
        Ok(result)
    }

    /// Build a query for the page of results following `previous`.
    ///
    /// The new query reuses the originating query's selector and page size
    /// with the start index advanced past the snapshots already returned.
    /// Fails with [`LookbackError::Pagination`] when `previous` indicates
    /// no further page.
    pub fn query_for_next_page(&self, previous: &LookbackResult) -> Result<LookbackQuery> {
        if !previous.has_more_pages() {
            return Err(LookbackError::Pagination(
                "previous result has no further pages".to_string(),
            ));
        }
        let base = previous.query_context().cloned().ok_or_else(|| {
            LookbackError::Pagination(
                "previous result is not associated with an executed query".to_string(),
            )
        })?;
        Ok(base.start(previous.next_start()))
    }

    async fn execute_request(&self, body: String) -> Result<RawResponse> {
        let (major, minor) = self.config.version();
        let url = endpoint::snapshot_query_url(
            self.config.server(),
            major,
            minor,
            self.config.workspace(),
        )?;

        let credentials = if self.transport.supports_credentials() {
            if self.config.has_credentials() && self.config.has_server() {
                self.config.credentials().cloned()
            } else {
                None
            }
        } else {
            if self.config.has_credentials() {
                warn!("transport does not support credential injection, dispatching unauthenticated");
            }
            None
        };

        debug!(url = %url, "dispatching snapshot query");
        let raw = self
            .transport
            .post(OutboundRequest {
                url,
                body,
                credentials,
            })
            .await?;
        debug!(status = raw.status, "snapshot query response received");
        Ok(raw)
    }
}

impl std::fmt::Debug for LookbackApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookbackApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
